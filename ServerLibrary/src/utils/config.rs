use std::fs;
use tokio::sync::RwLock;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use crate::utils::logging::*;

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::new());
}

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportMode {
    Itemized,
    Aggregated,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub bind_address: String, //address
    pub bind_port: u16, //port
    pub bind_retry_duration: u64, //seconds
    pub model_path: String, //path
    pub confidence_threshold: f32, //0-1
    pub iou_threshold: f32, //0-1
    pub inference_size: u32, //pixels
    pub report_mode: ReportMode,
    pub font_path: String, //path
    pub font_size: f32, //points
    pub border_width: u32, //pixels
    pub border_color: [u8; 3], //RGB
    pub text_color: [u8; 3], //RGB
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 7860,
            bind_retry_duration: 5,
            model_path: "./Model/best.onnx".to_string(),
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            inference_size: 1024,
            report_mode: ReportMode::Itemized,
            font_path: "./Font/label.ttf".to_string(),
            font_size: 24.0,
            border_width: 3,
            border_color: [255, 255, 255],
            text_color: [255, 255, 255],
        }
    }
}

impl Config {
    pub fn new() -> Self {
        match fs::read_to_string("./server.toml") {
            Ok(toml_string) => {
                match toml::from_str::<ConfigTable>(&toml_string) {
                    Ok(config_table) => {
                        let config = config_table.config;
                        //Seriously, the program must be terminated.
                        if !Self::validate(&config) {
                            logging_console!(emergency_entry!(SystemEntry::InvalidConfig));
                            panic!("Invalid configuration file");
                        }
                        config
                    },
                    Err(err) => {
                        logging_console!(emergency_entry!(SystemEntry::InvalidConfig, format!("Err: {err}")));
                        panic!("Unable to parse configuration file");
                    },
                }
            },
            Err(_) => {
                //A missing file is fine, the demo runs on its defaults.
                logging_console!(notice_entry!(SystemEntry::ConfigNotFound));
                Config::default()
            },
        }
    }

    pub async fn now() -> Config {
        CONFIG.read().await.clone()
    }

    pub fn validate(config: &Config) -> bool {
        Config::validate_second(config.bind_retry_duration)
            && Config::validate_threshold(config.confidence_threshold)
            && Config::validate_threshold(config.iou_threshold)
            && Config::validate_inference_size(config.inference_size)
            && Config::validate_font_size(config.font_size)
            && Config::validate_border_width(config.border_width)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_threshold(threshold: f32) -> bool {
        (0.0_f32..=1.0_f32).contains(&threshold)
    }

    fn validate_inference_size(size: u32) -> bool {
        size > 0_u32 && size <= 4096_u32
    }

    fn validate_border_width(width: u32) -> bool {
        width > 0_u32
    }

    fn validate_font_size(size: f32) -> bool {
        size > 0_f32
    }
}
