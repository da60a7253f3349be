use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use news_core::NewsArticle;
use news_logging::{news_debug, news_info};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("article url {url:?} is not a valid absolute url: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("no viewer available ({0} not found)")]
    NoViewer(String),
    #[error("viewer failed to start: {0}")]
    Io(#[from] io::Error),
}

/// External viewer a selected article is routed to.
pub trait Viewer {
    fn open(&self, url: &Url) -> Result<(), OpenError>;
}

/// Launches a program with the url as its last argument.
#[derive(Debug, Clone)]
pub struct CommandViewer {
    program: String,
    args: Vec<String>,
}

impl CommandViewer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The desktop's default URL handler.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "windows") {
            Self::new(
                "cmd",
                vec!["/C".to_string(), "start".to_string(), String::new()],
            )
        } else if cfg!(target_os = "macos") {
            Self::new("open", Vec::new())
        } else {
            Self::new("xdg-open", Vec::new())
        }
    }

    /// Starts the viewer and waits for it on a detached thread so the child
    /// is reaped once it exits.
    fn launch(&self, url: &Url) -> Result<JoinHandle<io::Result<ExitStatus>>, OpenError> {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => Ok(thread::spawn(move || reap(child))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(OpenError::NoViewer(self.program.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn reap(mut child: Child) -> io::Result<ExitStatus> {
    let status = child.wait()?;
    news_debug!("Viewer exited with {}", status);
    Ok(status)
}

impl Viewer for CommandViewer {
    fn open(&self, url: &Url) -> Result<(), OpenError> {
        self.launch(url).map(|_| ())
    }
}

/// Routes a selected article to `viewer`.
pub fn open_article(viewer: &dyn Viewer, article: &NewsArticle) -> Result<(), OpenError> {
    let url = Url::parse(article.url()).map_err(|source| OpenError::InvalidUrl {
        url: article.url().to_string(),
        source,
    })?;
    news_info!("Opening article {}", url);
    viewer.open(&url)
}
