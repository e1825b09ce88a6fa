// src/hal/tests.rs
//! Unit tests for HAL types

#[cfg(test)]
mod tests {
    use crate::hal::{DeviceOperation, DeviceParameters, StatusCode};
    use crate::params::{Mode, Polarity, Source, StimulationConfig};

    #[test]
    fn test_default_config_wire_order() {
        let params = DeviceParameters::from(&StimulationConfig::default());
        assert_eq!(params.as_array(), [1, 1, 1, 20, 100, 1, 100, 1]);
    }

    #[test]
    fn test_array_conversion_preserves_order() {
        let fields = [2, 3, 2, 150, 2000, 990, 10, 0];
        assert_eq!(DeviceParameters::from_array(fields).as_array(), fields);
    }

    #[test]
    fn test_read_back_maps_every_field() {
        let params = DeviceParameters::from_array([2, 2, 2, 55, 300, 40, 60, 0]);
        let config = StimulationConfig::from(params);

        assert_eq!(config.mode, Mode::Biphasic);
        assert_eq!(config.polarity, Polarity::Negative);
        assert_eq!(config.source, Source::External);
        assert_eq!(config.demand, 55);
        assert_eq!(config.pulse_width, 300);
        assert_eq!(config.dwell, 40);
        assert_eq!(config.recovery, 60);
        assert!(!config.enabled);
    }

    #[test]
    fn test_read_back_keeps_unknown_codes() {
        let params = DeviceParameters::from_array([9, 0, -1, 20, 100, 1, 100, 5]);
        let config = StimulationConfig::from(params);

        assert_eq!(config.mode, Mode::Unknown(9));
        assert_eq!(config.polarity, Polarity::Unknown(0));
        assert_eq!(config.source, Source::Unknown(-1));
        assert!(config.enabled);
        assert!(!params.has_binary_enabled());

        // Unknown codes go back out unchanged
        assert_eq!(DeviceParameters::from(&config).mode, 9);
    }

    #[test]
    fn test_operation_symbols() {
        assert_eq!(DeviceOperation::Set.symbol(), "DGD128_Set");
        assert_eq!(DeviceOperation::Get.symbol(), "DGD128_Get");
        assert_eq!(DeviceOperation::Trigger.to_string(), "DGD128_Trigger");
    }

    #[test]
    fn test_status_code_serialization() {
        let json = serde_json::to_string(&StatusCode(-2)).expect("Failed to serialize");
        assert_eq!(json, "-2");
        assert_eq!(StatusCode(-2).raw(), -2);
    }
}
