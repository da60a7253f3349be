//! News app: host-side collaborators and the load controller facade.
mod collaborators;
mod controller;
mod presenter;
mod settings;
mod viewer;

pub use collaborators::{AlwaysConnected, Connectivity, SettingsSource, TcpProbe};
pub use controller::{LoadController, LoadObserver};
pub use presenter::{empty_message_text, format_publication_date, render_row, TerminalPresenter};
pub use settings::{NewsSettings, SettingsError, SettingsStore, SETTINGS_FILENAME};
pub use viewer::{open_article, CommandViewer, OpenError, Viewer};
