use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::configuration::{DatabaseSettings, JwtSettings};
use crate::error::{form_error_handler, json_error_handler, path_error_handler, AppError};
use crate::logger::RequestLogger;
use crate::middleware::BearerGate;
use crate::routes::{
    create_booking, delete_user, get_bookings, get_current_user, health_check, login, refresh,
    register, remove_booking, root,
};
use crate::store::{BookingStore, InMemoryStore, PgStore, UserStore};

/// Persistence backends shared by all workers
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub bookings: Arc<dyn BookingStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            bookings: store,
        }
    }

    /// Connect to PostgreSQL and apply pending migrations
    pub async fn postgres(config: &DatabaseSettings) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.connection_string())
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let store = Arc::new(PgStore::new(pool));
        Ok(Self {
            users: store.clone(),
            bookings: store,
        })
    }
}

pub fn run(
    listener: TcpListener,
    stores: Stores,
    jwt_config: &JwtSettings,
) -> Result<Server, std::io::Error> {
    let tokens = TokenService::new(jwt_config);
    let tokens_data = web::Data::new(tokens.clone());
    let users = web::Data::from(stores.users);
    let bookings = web::Data::from(stores.bookings);

    let server = HttpServer::new(move || {
        let gate = || BearerGate::new(tokens.clone());

        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(RequestLogger)

            // Shared state
            .app_data(tokens_data.clone())
            .app_data(users.clone())
            .app_data(bookings.clone())

            // Extraction failures answer with the usual error body
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::FormConfig::default().error_handler(form_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))

            // Public routes
            .route("/", web::get().to(root))
            .route("/health_check", web::get().to(health_check))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))

            // Protected routes (require a valid access token)
            .service(
                web::resource("/get_current_user")
                    .wrap(gate())
                    .route(web::get().to(get_current_user)),
            )
            .service(
                web::resource("/delete_user")
                    .wrap(gate())
                    .route(web::delete().to(delete_user)),
            )
            .service(
                web::resource("/create_booking")
                    .wrap(gate())
                    .route(web::post().to(create_booking)),
            )
            .service(
                web::resource("/get_bookings")
                    .wrap(gate())
                    .route(web::get().to(get_bookings)),
            )
            .service(
                web::resource("/remove_booking/{booking_id}")
                    .wrap(gate())
                    .route(web::delete().to(remove_booking)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
