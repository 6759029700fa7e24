mod config;
mod logging;

use clap::Parser;
use eyre::WrapErr;
use futures::future;
use inwx::api::model::{NameserverInfoRequest, NameserverListRequest, NameserverRecordRequest};
use inwx::{Client, ClientOptions};

use self::config::{Args, Command, Config, DnssecCommand, RecordsCommand};
use self::logging::Logger;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load `.env` before parsing, so that clap sees its variables.
    #[cfg(feature = "dotenv")]
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    Logger::new(args.log_level).init().wrap_err("Failed to initialize logger")?;

    let config = Config::from_args(&args).await?;
    let options = ClientOptions { sandbox: config.sandbox };
    let client = Client::new(&config.username, &config.password, Some(options)).wrap_err("Failed to create client")?;

    log::info!(
        "Logging in as {} ({})",
        config.username,
        if config.sandbox { "sandbox" } else { "production" }
    );
    let login = client.account().login().await.wrap_err("Failed to log in")?;
    if login.needs_unlock() {
        let Some(tan) = config.tan.as_deref() else {
            eyre::bail!("Account uses two-factor authentication: pass a TAN with --tan to unlock the session");
        };
        client.account().unlock(tan).await.wrap_err("Failed to unlock session")?;
    }

    let result = run(&client, &args.command).await;

    // Always close the session, even after a failed command.
    if let Err(err) = client.account().logout().await {
        log::warn!("Failed to log out: {err}");
    }

    result
}

async fn run(client: &Client, command: &Command) -> eyre::Result<()> {
    match command {
        Command::Account => {
            let info = client.account().info().await.wrap_err("Failed to get account info")?;
            println!("Customer:  {} (id {})", info.customer_no, info.customer_id);
            println!("Username:  {}", info.username);
            println!("Name:      {} {}", info.first_name, info.last_name);
            if !info.organization.is_empty() {
                println!("Company:   {}", info.organization);
            }
            println!("Email:     {}", info.email);
        },
        Command::Check { domains } => {
            let resp = client.domains().check(domains).await.wrap_err("Failed to check domains")?;
            for check in &resp.domains {
                if check.is_available() {
                    println!("{}: available ({:.2})", check.domain, check.price);
                } else {
                    println!("{}: {}", check.domain, check.status);
                }
            }
        },
        Command::Records(cmd) => run_records(client, cmd).await?,
        Command::Dnssec(DnssecCommand::Info { domains }) => {
            let resp = client.dnssec().info(domains).await.wrap_err("Failed to get DNSSEC info")?;
            for info in &resp.data {
                println!("{}: {} ({} keys)", info.domain, info.dnssec_status, info.key_count);
            }
        },
    }

    Ok(())
}

async fn run_records(client: &Client, command: &RecordsCommand) -> eyre::Result<()> {
    let nameservers = client.nameservers();

    match command {
        RecordsCommand::List { domain } => {
            let request = NameserverListRequest {
                domain: domain.clone().unwrap_or_default(),
                ..Default::default()
            };
            let resp = nameservers
                .list_with_params(Some(&request))
                .await
                .wrap_err("Failed to list zones")?;

            println!("{} zone(s)", resp.count);
            for zone in &resp.domains {
                println!("{:>10}  {:<7} {}", zone.ro_id, zone.zone_type, zone.domain);
            }
        },
        RecordsCommand::Show { domains } => {
            let tasks = domains.iter().map(async |domain| {
                log::debug!("Getting records for {domain}...");
                let request = NameserverInfoRequest {
                    domain: domain.clone(),
                    ..Default::default()
                };
                nameservers
                    .info(&request)
                    .await
                    .wrap_err_with(|| format!("Failed to get records for {domain}"))
            });
            let zones = future::try_join_all(tasks).await?;

            for zone in &zones {
                println!("{} ({} records)", zone.domain, zone.records.len());
                for rec in &zone.records {
                    println!(
                        "{:>10}  {:<6} {:<30} {:>6}  {}",
                        rec.id, rec.record_type, rec.name, rec.ttl, rec.content
                    );
                }
            }
        },
        RecordsCommand::Find { id } => {
            let (rec, zone) = nameservers.find_record_by_id(*id).await?;
            println!("Zone:     {} (roId {})", zone.domain, zone.ro_id);
            println!("Name:     {}", rec.name);
            println!("Type:     {}", rec.record_type);
            println!("Content:  {}", rec.content);
            println!("TTL:      {}", rec.ttl);
            if rec.priority != 0 {
                println!("Priority: {}", rec.priority);
            }
        },
        RecordsCommand::Add {
            domain,
            record_type,
            content,
            name,
            ttl,
            prio,
        } => {
            let request = NameserverRecordRequest {
                domain: domain.clone(),
                record_type: record_type.to_uppercase(),
                content: content.clone(),
                name: name.clone().unwrap_or_default(),
                ttl: *ttl,
                priority: prio.unwrap_or_default(),
                ..Default::default()
            };
            let id = nameservers.create_record(&request).await.wrap_err("Failed to create record")?;
            log::info!("Created {} record {id} in {domain}", request.record_type);
        },
        RecordsCommand::Delete { id } => {
            nameservers.delete_record(*id).await.wrap_err("Failed to delete record")?;
            log::info!("Deleted record {id}");
        },
    }

    Ok(())
}
