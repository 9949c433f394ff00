use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Terminal client for ultimate tic-tac-toe.
#[derive(Parser, Debug, Clone)]
#[command(name = "uttt-client", version, about)]
pub struct Config {
    /// Display name announced to the server
    pub name: Option<String>,

    /// Websocket endpoint of the game server
    #[arg(long, env = "UTTT_SERVER", default_value = "ws://localhost:8080/ws", value_parser = parse_server)]
    pub server: Url,

    /// Directory for the rolling client log
    #[arg(long, env = "UTTT_LOG_DIR", default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Directory where finished games are saved as UGN records
    #[arg(long, env = "UTTT_RECORD_DIR")]
    pub record_dir: Option<PathBuf>,
}

fn parse_server(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|err| err.to_string())?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(format!("unsupported scheme '{}', expected ws or wss", other)),
    }
}

impl Config {
    pub fn connect_url(&self) -> Url {
        let mut url = self.server.clone();
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            url.query_pairs_mut().append_pair("name", name);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["uttt-client"]).unwrap();
        assert_eq!(config.name, None);
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
        assert_eq!(config.record_dir, None);
        assert_eq!(config.connect_url().path(), "/ws");
        assert_eq!(config.connect_url().query(), None);
    }

    #[test]
    fn test_connect_url_carries_name() {
        let config = Config::try_parse_from([
            "uttt-client",
            "alice smith",
            "--server",
            "wss://games.example.com/ws",
            "--record-dir",
            "games",
        ])
        .unwrap();
        assert_eq!(
            config.connect_url().as_str(),
            "wss://games.example.com/ws?name=alice+smith"
        );
        assert_eq!(config.record_dir, Some(PathBuf::from("games")));
    }

    #[test]
    fn test_rejects_non_websocket_server() {
        assert!(Config::try_parse_from(["uttt-client", "--server", "http://localhost/ws"]).is_err());
        assert!(Config::try_parse_from(["uttt-client", "--server", "not a url"]).is_err());
    }
}
