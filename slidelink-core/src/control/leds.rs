//! Speed LED bar brightness

use slidelink_hal::SPEED_LED_COUNT;

use super::position::map_range;

/// Percent at which each speed LED peaks
pub const SPEED_LED_CENTERS: [i32; SPEED_LED_COUNT] = [1, 25, 50, 75, 100];

/// Distance in percent over which a LED fades out
const FADE_SPAN: i32 = 24;

/// Brightness of a LED that is near but not at the percent
const NEAR_LEVEL: i32 = 50;

/// PWM level of each speed LED for a speed percent
///
/// The LED sitting exactly on the percent is fully on; the others glow
/// dimmer the further their centre is from it.
pub fn speed_led_levels(percent: i32) -> [u8; SPEED_LED_COUNT] {
    SPEED_LED_CENTERS.map(|center| {
        if percent == center {
            return u8::MAX;
        }
        let distance = (percent - center).abs().clamp(0, FADE_SPAN);
        map_range(distance, 0, FADE_SPAN, NEAR_LEVEL, 0) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_center_full_on() {
        assert_eq!(speed_led_levels(50), [0, 0, 255, 0, 0]);
        assert_eq!(speed_led_levels(1), [255, 0, 0, 0, 0]);
        assert_eq!(speed_led_levels(100), [0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_fade_between_centers() {
        let levels = speed_led_levels(26);
        assert_eq!(levels[1], 48);
        assert_eq!(levels[2], 0);
        let levels = speed_led_levels(62);
        assert_eq!(levels[2], 25);
        assert_eq!(levels[3], 23);
    }
}
