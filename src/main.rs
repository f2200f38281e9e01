use std::error::Error;
use std::sync::Arc;

use futures::future::FutureExt;
use tokio::sync::mpsc;
use warp::Filter;

use backend::config::{get_variable, Config};
use backend::demo::demo_videos;
use backend::environment::Environment;
use backend::ids::IdGenerator;
use backend::routes;
use backend::store::{MemoryStore, Store};
use backend::timestamp;
use backend::urls::Urls;
use log::{info, initialize_logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let main_port: u16 = get_variable("BACKEND_PORT")
        .parse()
        .expect("parse BACKEND_PORT as u16");
    let admin_port: u16 = get_variable("BACKEND_ADMIN_PORT")
        .parse()
        .expect("parse BACKEND_ADMIN_PORT as u16");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    let urls = Arc::new(Urls::new(get_variable("BACKEND_BASE_URL"))?);
    let config = Config::from_env();
    let ids = Arc::new(IdGenerator::new());

    let store: Arc<dyn Store> = if config.seed_demo_data() {
        info!(logger, "Seeding demo videos...");
        Arc::new(MemoryStore::with_videos(demo_videos(&ids, timestamp::now())))
    } else {
        Arc::new(MemoryStore::new())
    };

    if config.enable_testing_routes() {
        info!(logger, "Testing routes are enabled");
    }

    let environment = Environment::new(logger.clone(), store, ids, urls, config);

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate = Arc::new(move || {
        let termination_sender = termination_sender.clone();

        async move {
            // a full channel means termination is already under way
            let _ = termination_sender.try_send(());
        }
        .boxed()
    });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let (_, main_server) = warp::serve(routes::make_api(environment.clone()))
            .bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone()).or(
            routes::admin::make_termination_route(environment.clone(), terminate),
        );

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
