use crate::args::Args;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, warn};

pub struct DbClient {
    pub client: Arc<Client>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub dbname: String,
}

impl DbClient {
    /// Connect using the provided args.
    pub async fn connect(args: &Args) -> Result<Self> {
        let mut conn_str = format!(
            "host={} port={} user={} dbname={} application_name=quill",
            args.host, args.port, args.user, args.dbname
        );
        if let Some(pwd) = args.password.as_deref() {
            let quoted = pwd.replace('\\', "\\\\").replace('\'', "\\'");
            conn_str.push_str(&format!(" password='{}'", quoted));
        }
        debug!(
            "Connecting: host={} port={} user={} dbname={}",
            args.host, args.port, args.user, args.dbname
        );

        let (client, connection) = tokio_postgres::connect(&conn_str, NoTls)
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to {}:{}/{}",
                    args.host, args.port, args.dbname
                )
            })?;

        // Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("Connection error: {}", e);
            }
        });

        Ok(Self {
            client: Arc::new(client),
            host: args.host.clone(),
            port: args.port,
            user: args.user.clone(),
            dbname: args.dbname.clone(),
        })
    }

    /// Ask the server to abandon whatever statement is running.
    pub async fn cancel_running(&self) {
        match self.client.cancel_token().cancel_query(NoTls).await {
            Ok(()) => debug!("Cancel request sent"),
            Err(e) => warn!("Cancel request failed: {}", e),
        }
    }

    pub fn conninfo(&self) -> String {
        format!(
            "Connected to database \"{}\" as user \"{}\" on host \"{}\" port {}.",
            self.dbname, self.user, self.host, self.port
        )
    }
}
