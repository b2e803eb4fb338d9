use dotenv::dotenv;
use log::{error, info};

use obstacle_tilt_logger::config::{AppConfig, ConfigManager};
use obstacle_tilt_logger::logger;
use obstacle_tilt_logger::sampler::{RunSummary, SamplerError, ShutdownSignal};

fn main() {
    dotenv().ok(); // 加载 .env 文件
    logger::init_logger();
    info!("Application starting");

    let manager = match ConfigManager::load_or_default(ConfigManager::resolve_path()) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    match manager.config_path() {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }
    let config = manager.get_config();
    info!(
        "Obstacle pin {} (active {}), accelerometer {} @ 0x{:02X}, delay {:.1}s, log file {}",
        config.gpio.obstacle_pin,
        if config.gpio.active_low { "low" } else { "high" },
        config.accelerometer.i2c_bus,
        config.accelerometer.address,
        config.sampling.detection_delay_secs,
        config.storage.path,
    );

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.install_ctrl_c_handler() {
        error!("Failed to install Ctrl-C handler: {}", e);
        std::process::exit(1);
    }

    // run() 返回时硬件句柄已释放（GPIO 已 unexport）
    let code = match run(config, &shutdown) {
        Ok(summary) => {
            info!("Shut down cleanly ({} detections logged)", summary.detections);
            0
        }
        Err(e) => {
            error!("Sampling aborted: {}", e);
            1
        }
    };
    std::process::exit(code);
}

#[cfg(target_os = "linux")]
fn run(config: &AppConfig, shutdown: &ShutdownSignal) -> Result<RunSummary, SamplerError> {
    use linux_embedded_hal::I2cdev;
    use obstacle_tilt_logger::sampler::Sampler;
    use obstacle_tilt_logger::sensors::{Adxl345, SensorError, SysfsObstacleSensor};
    use obstacle_tilt_logger::storage::JsonLogStore;

    let obstacle = SysfsObstacleSensor::open(config.gpio.obstacle_pin, config.gpio.active_low)?;

    let bus = I2cdev::new(&config.accelerometer.i2c_bus)
        .map_err(|e| SensorError::I2c(format!("open {}: {e:?}", config.accelerometer.i2c_bus)))?;
    let accelerometer = Adxl345::new(bus, config.accelerometer.address)?;

    let store = JsonLogStore::new(config.get_storage_path(), config.storage.indent);
    let mut sampler = Sampler::new(
        obstacle,
        accelerometer,
        std::io::stdout(),
        store,
        config.sampling.detection_delay(),
    );

    sampler.run(shutdown)
}

#[cfg(not(target_os = "linux"))]
fn run(_config: &AppConfig, _shutdown: &ShutdownSignal) -> Result<RunSummary, SamplerError> {
    Err(obstacle_tilt_logger::sensors::SensorError::Gpio("sysfs GPIO is only available on Linux".to_string()).into())
}
