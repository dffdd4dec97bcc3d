use actix_web::{web, App, HttpServer};
use std::time::Duration;
use tokio::time::sleep;
use crate::detection::detector::{Detector, DetectorHandle};
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::page::{default, detect, javascript};

pub struct Manager;

impl Manager {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        let config = Config::now().await;
        let handle = Self::load_detector(&config).await;
        logging_information!(SystemEntry::InitializeComplete);
        let http_server = loop {
            let config = Config::now().await;
            let handle = handle.clone();
            let http_server = HttpServer::new(move || {
                App::new()
                    .app_data(handle.clone())
                    .service(detect::initialize())
                    .service(javascript::initialize())
                    .service(default::initialize())
            }).bind(format!("{}:{}", config.bind_address, config.bind_port));
            match http_server {
                Ok(http_server) => break http_server,
                Err(err) => {
                    let address = format!("{}:{}", config.bind_address, config.bind_port);
                    logging_error!(SystemEntry::BindPortError(address, err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                },
            }
        };
        logging_information!(SystemEntry::WebReady);
        logging_information!(SystemEntry::Online);
        if let Err(err) = http_server.run().await {
            logging_emergency!(SystemEntry::WebPanic(err));
        }
    }

    pub async fn terminate() {
        logging_information!(SystemEntry::Terminating);
        logging_information!(SystemEntry::TerminateComplete);
    }

    /// A load failure is not fatal: the server stays up in a degraded state
    /// and every request receives the error report.
    async fn load_detector(config: &Config) -> web::Data<DetectorHandle> {
        match Detector::initialize(config) {
            Ok(detector) => {
                logging_information!(format!("Model loaded from {} ({:?} head)", config.model_path, detector.task()));
                web::Data::new(DetectorHandle::new(Some(detector)))
            },
            Err(entry) => {
                logging_entry!(entry);
                web::Data::new(DetectorHandle::new(None))
            },
        }
    }
}
