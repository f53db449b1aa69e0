mod auth;
mod bulk_sms;
mod config;
mod db;
mod error;
mod gateway;
mod services;
mod state;


use crate::config::AppConfig;
use crate::state::AppState;
use actix_web::{web, App, HttpServer};
use common::model::user::Role;
use env_logger::Env;
use log::{error, info};
use std::io;

fn io_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::other(e.to_string())
}

/// Registers every API scope. Shared by `main` and the HTTP tests.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(services::auth::configure_routes())
        .service(services::sms::configure_routes())
        .service(services::notifications::configure_routes());
}

/// `add-user <username> <password> <operator|hod> [department]`
fn run_add_user(config: &AppConfig, args: &[String]) -> io::Result<()> {
    let (Some(username), Some(password), Some(role)) = (args.first(), args.get(1), args.get(2))
    else {
        return Err(io_error(
            "usage: attendance-notify add-user <username> <password> <operator|hod> [department]",
        ));
    };
    let role = Role::parse(role).ok_or_else(|| io_error(format!("unknown role '{}'", role)))?;
    let department = args.get(3).map(String::as_str);
    if role == Role::Hod && department.is_none() {
        return Err(io_error("a department is required for hod accounts"));
    }

    let conn = db::init(&config.database_path).map_err(io_error)?;
    auth::create_user(
        &conn,
        username,
        password,
        role,
        department,
        bcrypt::DEFAULT_COST,
    )
    .map_err(io_error)?;
    info!("Created {} account '{}'", role.as_str(), username);
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        error!("{}", e);
        io_error(e)
    })?;

    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("add-user") {
        return run_add_user(&config, &args[2..]);
    }

    let conn = db::init(&config.database_path).map_err(io_error)?;
    auth::seed_default_user(&conn, &config.auth).map_err(io_error)?;
    drop(conn);
    auth::warm_dummy_hash();

    let gateway = gateway::from_config(&config.sms);
    let host = config.host.clone();
    let port = config.port;
    let upload_limit = config.upload_limit_bytes;
    let state = AppState::new(config, gateway);

    info!(
        "Server running at http://{}:{} (sms provider: {})",
        host,
        port,
        state.gateway.provider_name()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(upload_limit))
            .app_data(web::Data::new(state.clone()))
            .configure(configure_app)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
