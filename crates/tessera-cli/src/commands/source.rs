use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Program text plus the name diagnostics show for it.
pub struct Source {
    pub name: Option<String>,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source is required: use a positional argument or -s/--source")]
    Missing,

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to read '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Inline text wins over a path; `-` reads stdin.
pub fn load_source(path: Option<&Path>, text: Option<&str>) -> Result<Source, SourceError> {
    if let Some(text) = text {
        return Ok(Source {
            name: None,
            text: text.to_owned(),
        });
    }

    let Some(path) = path else {
        return Err(SourceError::Missing);
    };

    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(SourceError::Stdin)?;
        return Ok(Source {
            name: Some("<stdin>".to_owned()),
            text,
        });
    }

    let text = fs::read_to_string(path).map_err(|source| SourceError::File {
        path: path.to_owned(),
        source,
    })?;
    Ok(Source {
        name: Some(path.display().to_string()),
        text,
    })
}

/// Loads the source or exits with an error message.
pub fn require_source(path: Option<&Path>, text: Option<&str>) -> Source {
    match load_source(path, text) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}
