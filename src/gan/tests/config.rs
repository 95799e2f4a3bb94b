use std::path::PathBuf;

use crate::gan::{ConfigError, SampleRange, TrainConfig};
use crate::nn::Device;

#[test]
fn test_default_is_reference_run() {
    let config = TrainConfig::default();
    assert_eq!(config.learning_rate, 2e-4);
    assert_eq!(config.betas, (0.5, 0.999));
    assert_eq!(config.num_epochs, 20);
    assert_eq!(config.batch_size, 100);
    assert_eq!(config.dim, 32);
    assert_eq!(config.channels, 3);
    assert_eq!(config.grid_width, 10);
    assert_eq!(config.train_range, SampleRange::new(0, 18000));
    assert_eq!(config.held_out_range, SampleRange::new(18000, 22000));
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_sample_path_follows_device() {
    let cpu = TrainConfig::for_device(Device::Cpu);
    assert_eq!(cpu.sample_path(1), PathBuf::from("samples/epoch_1.png"));

    let accelerated = TrainConfig::for_device(Device::Accelerator);
    assert_eq!(accelerated.device, Device::Accelerator);
    assert_eq!(accelerated.sample_path(20), PathBuf::from("/output/epoch_20.png"));
}

#[test]
fn test_validate_rejects_bad_values() {
    let with = |f: fn(&mut TrainConfig)| {
        let mut config = TrainConfig::default();
        f(&mut config);
        config.validate()
    };
    assert_eq!(with(|c| c.dim = 30), Err(ConfigError::InvalidDim(30)));
    assert_eq!(with(|c| c.dim = 0), Err(ConfigError::InvalidDim(0)));
    assert_eq!(with(|c| c.batch_size = 0), Err(ConfigError::Zero("batch_size")));
    assert_eq!(with(|c| c.grid_width = 0), Err(ConfigError::Zero("grid_width")));
    assert_eq!(with(|c| c.channels = 2), Err(ConfigError::UnsupportedChannels(2)));
    assert_eq!(
        with(|c| c.held_out_range = SampleRange::new(17000, 20000)),
        Err(ConfigError::OverlappingRanges {
            train: SampleRange::new(0, 18000),
            held_out: SampleRange::new(17000, 20000),
        })
    );
    assert_eq!(
        with(|c| c.train_range = SampleRange::new(5, 5)),
        Err(ConfigError::EmptyRange(SampleRange::new(5, 5)))
    );
}

#[test]
fn test_json_fills_missing_fields_with_defaults() {
    let config = TrainConfig::from_json(r#"{"num_epochs": 1, "device": "accelerator"}"#).unwrap();
    assert_eq!(config.num_epochs, 1);
    assert_eq!(config.device, Device::Accelerator);
    assert_eq!(config.batch_size, 100);

    let restored = TrainConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(restored, config);
}
