use macroquad::color::Color;

pub const BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 1.0);
pub const PREDATOR: Color = Color::new(1.0, 0.85, 0.2, 1.0);

/// Red for slow boids fading to blue for fast ones.
pub fn speed_rgb(speed: f32, min_speed: f32, max_speed: f32) -> (u8, u8, u8) {
    let span = max_speed - min_speed;
    let t = if span > 0.0 {
        ((speed - min_speed) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    ((255.0 * (1.0 - t)) as u8, 0, (255.0 * t) as u8)
}

pub fn speed_colour(speed: f32, min_speed: f32, max_speed: f32) -> Color {
    let (r, g, b) = speed_rgb(speed, min_speed, max_speed);
    Color::from_rgba(r, g, b, 255)
}

/// Hue sweep from red at the left wall through yellow, green, cyan and blue
/// to magenta at the right wall, so a flock's mixing shows up as colour.
pub fn spawn_x_rgb(x: f32, width: u32) -> (u8, u8, u8) {
    let span = width.saturating_sub(1) as f32;
    let t = if span > 0.0 {
        (x / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let sector = t * 5.0;
    let i = (sector.floor() as u32).min(4);
    let f = sector - i as f32;
    let up = (255.0 * f).round() as u8;
    let down = 255 - up;
    match i {
        0 => (255, up, 0),
        1 => (down, 255, 0),
        2 => (0, 255, up),
        3 => (0, down, 255),
        _ => (up, 0, 255),
    }
}

pub fn spawn_x_colour(x: f32, width: u32) -> Color {
    let (r, g, b) = spawn_x_rgb(x, width);
    Color::from_rgba(r, g, b, 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: f32 = 0.5;
    const MAX: f32 = 3.0;

    #[test]
    fn min_speed_is_pure_red() {
        assert_eq!(speed_rgb(MIN, MIN, MAX), (255, 0, 0));
    }

    #[test]
    fn below_min_clamps_to_red() {
        assert_eq!(speed_rgb(MIN - 0.1, MIN, MAX), (255, 0, 0));
        assert_eq!(speed_rgb(-MIN, MIN, MAX), (255, 0, 0));
    }

    #[test]
    fn max_and_above_are_pure_blue() {
        assert_eq!(speed_rgb(MAX, MIN, MAX), (0, 0, 255));
        assert_eq!(speed_rgb(MAX + 1.0, MIN, MAX), (0, 0, 255));
    }

    #[test]
    fn intermediate_speeds_truncate() {
        let range = MAX - MIN;
        assert_eq!(speed_rgb(MIN + 0.5 * range, MIN, MAX), (127, 0, 127));
        assert_eq!(speed_rgb(MIN + 0.25 * range, MIN, MAX), (191, 0, 63));
        assert_eq!(speed_rgb(MIN + 0.75 * range, MIN, MAX), (63, 0, 191));
    }

    #[test]
    fn spawn_x_walls_are_red_and_magenta() {
        assert_eq!(spawn_x_rgb(0.0, 11), (255, 0, 0));
        assert_eq!(spawn_x_rgb(10.0, 11), (255, 0, 255));
    }

    #[test]
    fn spawn_x_sector_boundaries() {
        // width 11 puts x = 2, 4, 6, 8 exactly on the sector edges
        assert_eq!(spawn_x_rgb(2.0, 11), (255, 255, 0));
        assert_eq!(spawn_x_rgb(4.0, 11), (0, 255, 0));
        assert_eq!(spawn_x_rgb(6.0, 11), (0, 255, 255));
        assert_eq!(spawn_x_rgb(8.0, 11), (0, 0, 255));
    }

    #[test]
    fn spawn_x_clamps_outside_the_world() {
        assert_eq!(spawn_x_rgb(-5.0, 11), (255, 0, 0));
        assert_eq!(spawn_x_rgb(50.0, 11), (255, 0, 255));
        assert_eq!(spawn_x_rgb(0.0, 1), (255, 0, 0));
    }
}
