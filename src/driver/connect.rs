//! Connection parameters handed to the driver.

use crate::driver::constants::{CLIENT_MULTI_STATEMENTS, MYSQL_DEFAULT_CHARSET, MYSQL_DEFAULT_PORT};
use crate::error::{Error, Result};
use std::time::Duration;

/// Connection parameters.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    /// Host address.
    pub host: String,
    /// Port number.
    pub port: u16,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Default database (schema) selected after login.
    pub database: String,
    /// Connection character set.
    pub charset: String,
    /// Allow several statements separated by `;` in one query.
    pub multi_statements: bool,
    /// Connection timeout (default: 20 seconds).
    pub connect_timeout: Duration,
}

impl ConnectParams {
    /// Create new connection parameters with default port and charset.
    pub fn new(host: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: MYSQL_DEFAULT_PORT,
            user: String::new(),
            password: String::new(),
            database: database.into(),
            charset: MYSQL_DEFAULT_CHARSET.to_string(),
            multi_statements: true,
            connect_timeout: Duration::from_secs(20),
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the login credentials.
    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Set the connection character set.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Enable or disable multi-statement queries.
    pub fn with_multi_statements(mut self, enabled: bool) -> Self {
        self.multi_statements = enabled;
        self
    }

    /// Set the connection timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use mysql_helper_rs::ConnectParams;
    /// use std::time::Duration;
    ///
    /// let params = ConnectParams::new("localhost", "game")
    ///     .with_connect_timeout(Duration::from_secs(5));
    /// assert_eq!(params.connect_timeout, Duration::from_secs(5));
    /// ```
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Client capability flags derived from these parameters.
    pub fn client_flags(&self) -> u32 {
        if self.multi_statements {
            CLIENT_MULTI_STATEMENTS
        } else {
            0
        }
    }

    /// Parse a connect string like `user:password@host:port/database?charset=utf8`.
    ///
    /// The user info, port and query part are optional; an optional
    /// `mysql://` scheme prefix is accepted.
    pub fn parse(conn_str: &str) -> Result<Self> {
        let rest = conn_str.strip_prefix("mysql://").unwrap_or(conn_str);

        let (rest, query) = match rest.split_once('?') {
            Some((r, q)) => (r, Some(q)),
            None => (rest, None),
        };

        let (userinfo, rest) = match rest.rsplit_once('@') {
            Some((u, r)) => (Some(u), r),
            None => (None, rest),
        };

        let (addr_part, database) =
            rest.split_once('/')
                .ok_or_else(|| Error::InvalidConnectString {
                    message: "Expected format: [user[:password]@]host[:port]/database".to_string(),
                })?;

        if database.is_empty() {
            return Err(Error::InvalidConnectString {
                message: "Missing database name".to_string(),
            });
        }

        let (host, port) = if let Some((h, p)) = addr_part.split_once(':') {
            let port = p.parse::<u16>().map_err(|_| Error::InvalidConnectString {
                message: format!("Invalid port: {}", p),
            })?;
            (h, port)
        } else {
            (addr_part, MYSQL_DEFAULT_PORT)
        };

        if host.is_empty() {
            return Err(Error::InvalidConnectString {
                message: "Missing host".to_string(),
            });
        }

        let mut params = Self::new(host, database).with_port(port);

        if let Some(userinfo) = userinfo {
            let (user, password) = userinfo.split_once(':').unwrap_or((userinfo, ""));
            params = params.with_credentials(user, password);
        }

        for pair in query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter(|p| !p.is_empty())
        {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "charset" => params.charset = value.to_string(),
                "multi_statements" => {
                    params.multi_statements = parse_flag(value).ok_or_else(|| {
                        Error::InvalidConnectString {
                            message: format!("Invalid multi_statements value: {}", value),
                        }
                    })?
                }
                "connect_timeout" => {
                    let secs = value.parse::<u64>().map_err(|_| Error::InvalidConnectString {
                        message: format!("Invalid connect_timeout: {}", value),
                    })?;
                    params.connect_timeout = Duration::from_secs(secs);
                }
                _ => {
                    return Err(Error::InvalidConnectString {
                        message: format!("Unknown option: {}", key),
                    })
                }
            }
        }

        Ok(params)
    }

    /// Read parameters from `<PREFIX>_HOST`, `<PREFIX>_PORT`, `<PREFIX>_USER`,
    /// `<PREFIX>_PASSWORD`, `<PREFIX>_DATABASE` and `<PREFIX>_CHARSET`.
    ///
    /// Host defaults to `localhost`; database is required.
    pub fn from_env(prefix: &str) -> Result<Self> {
        let var = |name: &str| std::env::var(format!("{}_{}", prefix, name)).ok();

        let database = var("DATABASE").ok_or_else(|| Error::InvalidConnectString {
            message: format!("{}_DATABASE is not set", prefix),
        })?;
        let host = var("HOST").unwrap_or_else(|| "localhost".to_string());

        let mut params = Self::new(host, database);
        if let Some(port) = var("PORT") {
            params.port = port.parse::<u16>().map_err(|_| Error::InvalidConnectString {
                message: format!("Invalid port: {}", port),
            })?;
        }
        if let Some(user) = var("USER") {
            params.user = user;
        }
        if let Some(password) = var("PASSWORD") {
            params.password = password;
        }
        if let Some(charset) = var("CHARSET") {
            params.charset = charset;
        }
        Ok(params)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
