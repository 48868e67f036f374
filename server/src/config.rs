use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "client/dist";

/// The dashboard payloads are fixed for the life of the process.
pub const API_CACHE_CONTROL: &str = "public, max-age=300";

pub fn server_port() -> u16 {
    std::env::var("VERDE_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn static_dir() -> PathBuf {
    std::env::var("VERDE_STATIC_DIR")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_when_unset_zero_or_invalid() {
        temp_env::with_var_unset("VERDE_PORT", || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var("VERDE_PORT", Some("0"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var("VERDE_PORT", Some("eighty"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var("VERDE_PORT", Some(" 8080 "), || {
            assert_eq!(server_port(), 8080);
        });
    }

    #[test]
    fn static_dir_falls_back_on_blank_values() {
        temp_env::with_var("VERDE_STATIC_DIR", Some("   "), || {
            assert_eq!(static_dir(), PathBuf::from("client/dist"));
        });
        temp_env::with_var("VERDE_STATIC_DIR", Some("/srv/verde"), || {
            assert_eq!(static_dir(), PathBuf::from("/srv/verde"));
        });
    }
}
