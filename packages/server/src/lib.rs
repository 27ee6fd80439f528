// Danta Banner Bot - Server Core
//
// Bridges a Lark questionnaire to the DanXi app config: new applications are
// posted to an approval group as cards, and approved banners are committed
// to the config file on GitHub.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
