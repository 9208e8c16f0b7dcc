//! Per-code-point color generators for the gradient and rainbow tags.
//!
//! Both effects run over a single text run, yielding one color per code
//! point. The cycle length is measured in UTF-16 code units, so a
//! supplementary-plane character advances the position by one step but
//! widens the cycle by two units.

use crate::color::Color;

/// Number of UTF-16 code units needed to encode `text`.
pub(crate) fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Phase-shiftable multi-stop linear gradient.
///
/// Stops interpolate pairwise in RGB space. The integer phase offsets the
/// starting position; once the running factor overshoots a stop boundary it
/// bounces back rather than wrapping, mirroring the sequence.
#[derive(Clone, Debug)]
pub struct Gradient {
    stops: Vec<Color>,
    factor_step: f32,
    phase: f32,
    negative_phase: bool,
    index: usize,
    color_index: usize,
}

impl Gradient {
    /// A gradient over a run of `len_utf16` code units. `stops` must hold at
    /// least two colors; a negative phase is passed as `1 + phase` with
    /// `negative_phase` set.
    pub fn new(stops: Vec<Color>, phase: f32, negative_phase: bool, len_utf16: usize) -> Gradient {
        debug_assert!(stops.len() >= 2);
        let segments = stops.len().saturating_sub(1).max(1);
        let sector = len_utf16 / segments;
        let factor_step = if sector > 1 { 1.0 / (sector as f32 - 1.0) } else { 1.0 };
        Gradient {
            stops,
            factor_step,
            phase,
            negative_phase,
            index: 0,
            color_index: 0,
        }
    }

    /// Color for the next code point.
    pub fn next_color(&mut self) -> Color {
        // advance to the next stop pair once the running factor has
        // overshot the boundary by more than a tenth
        if self.factor_step * self.index as f32 > 1.1 {
            self.color_index += 1;
            self.index = 0;
        }

        let mut factor = self.factor_step * (self.index as f32 + self.phase);
        self.index += 1;
        if factor > 1.0 {
            factor = 1.0 - (factor - 1.0);
        }

        let at = self.color_index.min(self.stops.len().saturating_sub(2));
        if self.negative_phase && self.stops.len() % 2 == 1 {
            Color::lerp(factor, self.stops[at + 1], self.stops[at])
        } else {
            Color::lerp(factor, self.stops[at], self.stops[at + 1])
        }
    }
}

/// Hue-cycling colorizer built from three phase-shifted sine waves.
///
/// The hue sweeps one full cycle over the run; the integer phase argument
/// shifts the starting point of the sweep.
#[derive(Clone, Debug)]
pub struct Rainbow {
    frequency: f64,
    phase: f64,
    index: usize,
}

impl Rainbow {
    /// A rainbow over a run of `len_utf16` code units.
    pub fn new(phase: i32, len_utf16: usize) -> Rainbow {
        Rainbow {
            frequency: std::f64::consts::PI * 2.0 / len_utf16.max(1) as f64,
            phase: phase as f64,
            index: 0,
        }
    }

    /// Color for the next code point.
    pub fn next_color(&mut self) -> Color {
        let base = self.frequency * self.index as f64;
        self.index += 1;
        let r = ((base + 2.0 + self.phase).sin() * 127.0 + 128.0) as u8;
        let g = ((base + self.phase).sin() * 127.0 + 128.0) as u8;
        let b = ((base + 4.0 + self.phase).sin() * 127.0 + 128.0) as u8;
        Color::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Color {
        Color::parse(name).expect("named color")
    }

    fn gradient_colors(stops: &[&str], phase: i32, text: &str) -> Vec<String> {
        let stops: Vec<Color> = stops.iter().map(|s| named(s)).collect();
        let (phase, negative) = if phase < 0 {
            ((1 + phase) as f32, true)
        } else {
            (phase as f32, false)
        };
        let mut generator = Gradient::new(stops, phase, negative, utf16_len(text));
        text.chars().map(|_| generator.next_color().to_string()).collect()
    }

    fn rainbow_colors(phase: i32, text: &str) -> Vec<String> {
        let mut generator = Rainbow::new(phase, utf16_len(text));
        text.chars().map(|_| generator.next_color().to_string()).collect()
    }

    const BAR_24: &str = "||||||||||||||||||||||||";
    const BAR_54: &str = "||||||||||||||||||||||||||||||||||||||||||||||||||||||";

    #[test]
    fn utf16_len_counts_code_units() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("𐌰𐌱𐌲"), 6);
    }

    #[test]
    fn two_stop_default_gradient() {
        assert_eq!(gradient_colors(&["white", "black"], 0, BAR_24), [
            "white", "#f4f4f4", "#e9e9e9", "#dedede", "#d3d3d3", "#c8c8c8", "#bcbcbc",
            "#b1b1b1", "#a6a6a6", "#9b9b9b", "#909090", "#858585", "#7a7a7a", "#6f6f6f",
            "#646464", "#595959", "#4e4e4e", "#434343", "#373737", "#2c2c2c", "#212121",
            "#161616", "#0b0b0b", "black",
        ]);
    }

    #[test]
    fn two_stop_hex_gradient() {
        let colors = gradient_colors(&["#5e4fa2", "#f79459"], 0, BAR_24);
        assert_eq!(colors.first().map(String::as_str), Some("#5e4fa2"));
        assert_eq!(colors.get(1).map(String::as_str), Some("#65529f"));
        assert_eq!(colors.get(12).map(String::as_str), Some("#ae737c"));
        assert_eq!(colors.last().map(String::as_str), Some("#f79459"));
    }

    #[test]
    fn two_stop_named_gradient() {
        assert_eq!(gradient_colors(&["green", "blue"], 0, BAR_24), [
            "green", "#55f85c", "#55f064", "#55e96b", "#55e173", "#55da7a", "#55d381",
            "#55cb89", "#55c490", "#55bc98", "#55b59f", "#55aea6", "#55a6ae", "#559fb5",
            "#5598bc", "#5590c4", "#5589cb", "#5581d3", "#557ada", "#5573e1", "#556be9",
            "#5564f0", "#555cf8", "blue",
        ]);
    }

    #[test]
    fn two_stop_gradient_with_phase_bounces() {
        assert_eq!(gradient_colors(&["green", "blue"], 10, BAR_24), [
            "#55b59f", "#55aea6", "#55a6ae", "#559fb5", "#5598bc", "#5590c4", "#5589cb",
            "#5581d3", "#557ada", "#5573e1", "#556be9", "#5564f0", "#555cf8", "blue",
            "#555cf8", "#5564f0", "#556be9", "#5573e1", "#557ada", "#5581d3", "#5589cb",
            "#5590c4", "#5598bc", "#559fb5",
        ]);
    }

    #[test]
    fn five_stop_gradient_repeats_at_stop_boundaries() {
        assert_eq!(gradient_colors(&["red", "blue", "green", "yellow", "red"], 0, BAR_54), [
            "red", "#f15563", "#e35571", "#d55580", "#c6558e", "#b8559c", "#aa55aa",
            "#9c55b8", "#8e55c6", "#8055d5", "#7155e3", "#6355f1", "blue", "#6355f1",
            "blue", "#5563f1", "#5571e3", "#5580d5", "#558ec6", "#559cb8", "#55aaaa",
            "#55b89c", "#55c68e", "#55d580", "#55e371", "#55f163", "green", "#55f163",
            "green", "#63ff55", "#71ff55", "#80ff55", "#8eff55", "#9cff55", "#aaff55",
            "#b8ff55", "#c6ff55", "#d5ff55", "#e3ff55", "#f1ff55", "yellow", "#f1ff55",
            "yellow", "#fff155", "#ffe355", "#ffd555", "#ffc655", "#ffb855", "#ffaa55",
            "#ff9c55", "#ff8e55", "#ff8055", "#ff7155", "#ff6355",
        ]);
    }

    #[test]
    fn three_stop_gradient_mirrors_after_the_middle_stop() {
        assert_eq!(gradient_colors(&["black", "white", "black"], 0, BAR_54), [
            "black", "#0a0a0a", "#141414", "#1d1d1d", "#272727", "#313131", "#3b3b3b",
            "#454545", "#4e4e4e", "#585858", "#626262", "#6c6c6c", "#767676", "#808080",
            "#898989", "#939393", "#9d9d9d", "#a7a7a7", "#b1b1b1", "#bababa", "#c4c4c4",
            "#cecece", "#d8d8d8", "#e2e2e2", "#ebebeb", "#f5f5f5", "white", "#f5f5f5",
            "#ebebeb", "white", "#f5f5f5", "#ebebeb", "#e2e2e2", "#d8d8d8", "#cecece",
            "#c4c4c4", "#bababa", "#b1b1b1", "#a7a7a7", "#9d9d9d", "#939393", "#898989",
            "#808080", "#767676", "#6c6c6c", "#626262", "#585858", "#4e4e4e", "#454545",
            "#3b3b3b", "#313131", "#272727", "#1d1d1d", "#141414",
        ]);
    }

    #[test]
    fn three_stop_gradient_with_phase_mirrors_at_the_boundary() {
        assert_eq!(gradient_colors(&["black", "white", "black"], 10, BAR_54), [
            "#626262", "#6c6c6c", "#767676", "#808080", "#898989", "#939393", "#9d9d9d",
            "#a7a7a7", "#b1b1b1", "#bababa", "#c4c4c4", "#cecece", "#d8d8d8", "#e2e2e2",
            "#ebebeb", "#f5f5f5", "white", "#f5f5f5", "#ebebeb", "#e2e2e2", "#d8d8d8",
            "#cecece", "#c4c4c4", "#bababa", "#b1b1b1", "#a7a7a7", "#9d9d9d", "#939393",
            "#898989", "#9d9d9d", "#939393", "#898989", "#808080", "#767676", "#6c6c6c",
            "#626262", "#585858", "#4e4e4e", "#454545", "#3b3b3b", "#313131", "#272727",
            "#1d1d1d", "#141414", "#0a0a0a", "black", "#0a0a0a", "#141414", "#1d1d1d",
            "#272727", "#313131", "#3b3b3b", "#454545", "#4e4e4e",
        ]);
    }

    #[test]
    fn gradient_counts_supplementary_chars_as_two_units() {
        assert_eq!(gradient_colors(&["green", "blue"], 3, "𐌰𐌱𐌲"), [
            "#5599bb", "#5577dd", "blue",
        ]);
    }

    #[test]
    fn single_char_gets_the_first_stop() {
        assert_eq!(gradient_colors(&["green", "blue"], 0, "x"), ["green"]);
    }

    #[test]
    fn rainbow_sweeps_one_full_cycle() {
        assert_eq!(rainbow_colors(0, BAR_24), [
            "#f3801f", "#e1a00d", "#c9bf03", "#acd901", "#8bed08", "#6afa16", "#4bff2c",
            "#2ffa48", "#18ed68", "#08d989", "#01bfa9", "#02a0c7", "#0c80e0", "#1e5ff2",
            "#3640fc", "#5326fe", "#7412f7", "#9505e9", "#b401d3", "#d005b7", "#e71297",
            "#f72676", "#fe4056", "#fd5f38",
        ]);
    }

    #[test]
    fn rainbow_phase_shifts_the_sweep() {
        assert_eq!(rainbow_colors(2, BAR_24), [
            "#1ff35c", "#0de17d", "#03c99e", "#01acbd", "#088bd7", "#166aec", "#2c4bf9",
            "#482ffe", "#6818fb", "#8908ef", "#a901db", "#c702c1", "#e00ca3", "#f21e82",
            "#fc3661", "#fe5342", "#f77428", "#e99513", "#d3b406", "#b7d001", "#97e704",
            "#76f710", "#56fe24", "#38fd3e",
        ]);
    }

    #[test]
    fn rainbow_over_five_chars() {
        assert_eq!(rainbow_colors(0, " wooo"), [
            "#f3801f", "#71f813", "#03ca9c", "#4135fe", "#d507b1",
        ]);
    }

    #[test]
    fn single_char_rainbow_does_not_divide_by_zero() {
        assert_eq!(rainbow_colors(0, "x"), ["#f3801f"]);
    }
}
