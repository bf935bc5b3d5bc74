//! Adaptive lighting — drifts a light's color temperature with the time of day.
//!
//! The controller owns a periodic task that computes a target color
//! temperature (cool around midday, warm at night, warmer again at low
//! brightness) and writes it through the service's `ColorTemperature`
//! characteristic, which forwards to the device like any external write.

use chrono::Timelike;

use capbridge_domain::characteristic::CharacteristicType;
use capbridge_domain::error::ConstructionError;
use capbridge_domain::value::Value;

use super::Service;

/// How often the schedule re-evaluates the target color temperature.
const TICK: std::time::Duration = std::time::Duration::from_secs(60);

/// Periodic color-temperature controller scoped to one service.
///
/// Dropping the controller aborts its task; the binder hands ownership to
/// the service, and handle cleanup detaches it.
pub struct AdaptiveLightingController {
    task: tokio::task::JoinHandle<()>,
}

impl AdaptiveLightingController {
    /// Attach a controller to `service`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] when the service lacks a Brightness or
    /// `ColorTemperature` characteristic.
    pub fn attach(service: &Service) -> Result<Self, ConstructionError> {
        let brightness = service
            .find_characteristic(CharacteristicType::Brightness)
            .ok_or_else(|| missing("Brightness"))?;
        let color_temperature = service
            .find_characteristic(CharacteristicType::ColorTemperature)
            .ok_or_else(|| missing("ColorTemperature"))?;
        let power = service.find_characteristic(CharacteristicType::On);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK);
            loop {
                ticker.tick().await;
                // A light that is off keeps its last color temperature.
                if power.as_ref().and_then(|p| p.value().as_bool()) == Some(false) {
                    continue;
                }
                let now = chrono::Local::now().time();
                let minutes = now.hour() * 60 + now.minute();
                let level = brightness.value().as_i64().unwrap_or(100);
                let target = target_mireds(minutes, level);
                color_temperature.write(&Value::Int(target)).await;
            }
        });

        Ok(Self { task })
    }
}

impl Drop for AdaptiveLightingController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn missing(characteristic: &'static str) -> ConstructionError {
    ConstructionError {
        what: "adaptive lighting controller",
        reason: format!("service has no {characteristic} characteristic"),
    }
}

/// Target color temperature in mireds for a time of day and brightness.
///
/// Follows a cosine over the day — coolest at noon, warmest at midnight —
/// and shifts warmer as brightness drops.
#[must_use]
pub fn target_mireds(minutes_since_midnight: u32, brightness_pct: i64) -> i64 {
    let day_fraction = f64::from(minutes_since_midnight % 1440) / 1440.0;
    let solar = ((day_fraction - 0.5) * std::f64::consts::TAU).cos();
    let base = 300.0 - 140.0 * solar;
    let dim_shift = (100 - brightness_pct.clamp(0, 100)) / 2;
    #[allow(clippy::cast_possible_truncation)]
    let mireds = base.round() as i64 + dim_shift;
    mireds.clamp(140, 500)
}

#[cfg(test)]
mod tests {
    use super::*;
    use capbridge_domain::service::ServiceType;
    use crate::accessory::Accessory;

    #[test]
    fn should_be_coolest_at_noon_and_warmest_at_midnight() {
        let noon = target_mireds(12 * 60, 100);
        let midnight = target_mireds(0, 100);
        assert!(noon < midnight);
        assert_eq!(noon, 160);
        assert_eq!(midnight, 440);
    }

    #[test]
    fn should_shift_warmer_at_low_brightness() {
        let bright = target_mireds(12 * 60, 100);
        let dim = target_mireds(12 * 60, 10);
        assert!(dim > bright);
    }

    #[test]
    fn should_stay_within_protocol_range() {
        for minutes in (0..1440).step_by(30) {
            for brightness in [0, 50, 100] {
                let mireds = target_mireds(minutes, brightness);
                assert!((140..=500).contains(&mireds));
            }
        }
    }

    #[tokio::test]
    async fn should_refuse_service_without_color_temperature() {
        let accessory = Accessory::new("dev-1", "Lamp");
        let service = accessory.service(ServiceType::Lightbulb, "");
        let _ = service.characteristic(CharacteristicType::Brightness);

        let result = AdaptiveLightingController::attach(&service);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn should_attach_when_both_characteristics_exist() {
        let accessory = Accessory::new("dev-1", "Lamp");
        let service = accessory.service(ServiceType::Lightbulb, "");
        let _ = service.characteristic(CharacteristicType::Brightness);
        let _ = service.characteristic(CharacteristicType::ColorTemperature);

        let controller = AdaptiveLightingController::attach(&service).unwrap();
        service.set_adaptive_lighting(controller);
        assert!(service.has_adaptive_lighting());

        service.detach_adaptive_lighting();
        assert!(!service.has_adaptive_lighting());
    }
}
