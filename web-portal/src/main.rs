use actix_files::Files;
use actix_web::{cookie::Key, middleware, web::Data, App, HttpServer};
use common::error::CrmResult;
use crm_api::HttpCrmApi;
use web_portal::{config::PortalConfig, init_logging, pages::Pages, session_middleware};

#[actix_web::main]
async fn main() -> CrmResult<()> {
    let config = PortalConfig::from_env()?;
    init_logging(&config.log_config)?;

    let secret_key = config.secret_key.clone().unwrap_or_else(|| {
        log::warn!("SECRET_KEY is not set. Sessions will not survive a restart of the portal");
        Key::generate()
    });
    let cookie_secure = config.cookie_secure;
    let assets_dir = config.assets_dir.clone();
    let api = Data::new(HttpCrmApi::new(config.api_url.clone()));

    log::info!(
        "Starting web portal on {} using the CRM API at {}",
        config.address,
        config.api_url
    );
    HttpServer::new(move || {
        App::new()
            .wrap(session_middleware(secret_key.clone(), cookie_secure))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .app_data(api.clone())
            .service(Files::new("/assets", &assets_dir))
            .add_pages::<HttpCrmApi>()
    })
    .bind(config.address.as_str())?
    .run()
    .await?;
    Ok(())
}
