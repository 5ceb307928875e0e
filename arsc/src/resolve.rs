//! Selection of the configuration that best fits a requested device profile.
//!
//! The axis order in [`ResourceConfig::is_better_than`] decides which
//! qualifier wins when two candidates differ in more than one axis, and must
//! stay in platform order.
use crate::config::ResourceConfig;

type Config = ResourceConfig;

/// Whether `candidate` may be used on a device described by `target`.
pub fn is_compatible(candidate: &ResourceConfig, target: &ResourceConfig) -> bool {
    candidate.matches(target)
}

/// Whether compatible candidate `a` should be preferred over `b` for `target`.
pub fn is_more_specific(a: &ResourceConfig, b: &ResourceConfig, target: &ResourceConfig) -> bool {
    a.is_better_than(b, target)
}

/// Index of the best compatible candidate, the first one on ties.
pub fn select_best<'c, I>(candidates: I, target: &ResourceConfig) -> Option<usize>
where
    I: IntoIterator<Item = &'c ResourceConfig>,
{
    let mut best: Option<(usize, &ResourceConfig)> = None;
    for (i, candidate) in candidates.into_iter().enumerate() {
        if !candidate.matches(target) {
            continue;
        }
        match best {
            Some((_, current)) if !candidate.is_better_than(current, target) => {}
            _ => best = Some((i, candidate)),
        }
    }
    best.map(|(i, _)| i)
}

const ENGLISH: [u8; 2] = *b"en";
const UNITED_STATES: [u8; 2] = *b"US";

fn is_tagalog(language: [u8; 2]) -> bool {
    // "tl" or the packed form of "fil".
    language == *b"tl" || language == [0xad, 0x05]
}

fn langs_are_equivalent(a: [u8; 2], b: [u8; 2]) -> bool {
    a == b || (is_tagalog(a) && is_tagalog(b))
}

/// Orders two resource regions by closeness to the requested one.
///
/// An exact match wins. Otherwise a resource without a region stands for the
/// language as a whole and beats one for an unrelated region.
fn compare_regions(a: [u8; 2], b: [u8; 2], requested: [u8; 2]) -> i32 {
    if a == b {
        return 0;
    }
    if a == requested {
        return 1;
    }
    if b == requested {
        return -1;
    }
    if a[0] == 0 {
        return 1;
    }
    if b[0] == 0 {
        return -1;
    }
    0
}

impl ResourceConfig {
    /// Whether this configuration is usable with the device `settings`.
    ///
    /// Every axis set here has to agree with `settings`. Size-like axes
    /// (screen size class, dimensions, sdk version) only have to fit.
    pub fn matches(&self, settings: &Config) -> bool {
        if self.imsi() != 0 {
            if self.mcc != 0 && self.mcc != settings.mcc {
                return false;
            }
            if self.mnc != 0 && self.mnc != settings.mnc {
                return false;
            }
        }
        if self.locale() != 0 {
            if !langs_are_equivalent(self.language, settings.language) {
                return false;
            }
            // Without a script on both sides the region decides.
            let countries_must_match = settings.locale_script[0] == 0
                || (self.locale_script[0] == 0 && !self.locale_script_was_computed);
            if countries_must_match {
                if self.region[0] != 0 && self.region != settings.region {
                    return false;
                }
            } else if self.locale_script != settings.locale_script {
                return false;
            }
        }
        if self.grammatical_inflection != 0
            && self.grammatical_inflection != settings.grammatical_inflection
        {
            return false;
        }
        if self.screen_config() != 0 {
            let layout_dir = self.screen_layout & Config::MASK_LAYOUTDIR;
            let set_layout_dir = settings.screen_layout & Config::MASK_LAYOUTDIR;
            if layout_dir != 0 && layout_dir != set_layout_dir {
                return false;
            }
            // Sizes for larger screens than the device do not match.
            let screen_size = self.screen_layout & Config::MASK_SCREENSIZE;
            let set_screen_size = settings.screen_layout & Config::MASK_SCREENSIZE;
            if screen_size != 0 && screen_size > set_screen_size {
                return false;
            }
            let screen_long = self.screen_layout & Config::MASK_SCREENLONG;
            let set_screen_long = settings.screen_layout & Config::MASK_SCREENLONG;
            if screen_long != 0 && screen_long != set_screen_long {
                return false;
            }
            let ui_mode_type = self.ui_mode & Config::MASK_UI_MODE_TYPE;
            let set_ui_mode_type = settings.ui_mode & Config::MASK_UI_MODE_TYPE;
            if ui_mode_type != 0 && ui_mode_type != set_ui_mode_type {
                return false;
            }
            let ui_mode_night = self.ui_mode & Config::MASK_UI_MODE_NIGHT;
            let set_ui_mode_night = settings.ui_mode & Config::MASK_UI_MODE_NIGHT;
            if ui_mode_night != 0 && ui_mode_night != set_ui_mode_night {
                return false;
            }
            if self.smallest_screen_width_dp != 0
                && self.smallest_screen_width_dp > settings.smallest_screen_width_dp
            {
                return false;
            }
        }
        if self.screen_config2() != 0 {
            let round = self.screen_layout2 & Config::MASK_SCREENROUND;
            let set_round = settings.screen_layout2 & Config::MASK_SCREENROUND;
            if round != 0 && round != set_round {
                return false;
            }
            let hdr = self.color_mode & Config::MASK_HDR;
            let set_hdr = settings.color_mode & Config::MASK_HDR;
            if hdr != 0 && hdr != set_hdr {
                return false;
            }
            let wide = self.color_mode & Config::MASK_WIDE_COLOR_GAMUT;
            let set_wide = settings.color_mode & Config::MASK_WIDE_COLOR_GAMUT;
            if wide != 0 && wide != set_wide {
                return false;
            }
        }
        if self.screen_size_dp() != 0 {
            if self.screen_width_dp != 0 && self.screen_width_dp > settings.screen_width_dp {
                return false;
            }
            if self.screen_height_dp != 0 && self.screen_height_dp > settings.screen_height_dp {
                return false;
            }
        }
        if self.screen_type() != 0 {
            if self.orientation != 0 && self.orientation != settings.orientation {
                return false;
            }
            // Density always matches, the closest one is picked later and scaled.
            if self.touchscreen != 0 && self.touchscreen != settings.touchscreen {
                return false;
            }
        }
        if self.input() != 0 {
            let keys_hidden = self.input_flags & Config::MASK_KEYSHIDDEN;
            let set_keys_hidden = settings.input_flags & Config::MASK_KEYSHIDDEN;
            // A request for exposed keys also accepts a soft keyboard.
            if keys_hidden != 0
                && keys_hidden != set_keys_hidden
                && !(keys_hidden == Config::KEYSHIDDEN_NO
                    && set_keys_hidden == Config::KEYSHIDDEN_SOFT)
            {
                return false;
            }
            let nav_hidden = self.input_flags & Config::MASK_NAVHIDDEN;
            let set_nav_hidden = settings.input_flags & Config::MASK_NAVHIDDEN;
            if nav_hidden != 0 && nav_hidden != set_nav_hidden {
                return false;
            }
            if self.keyboard != 0 && self.keyboard != settings.keyboard {
                return false;
            }
            if self.navigation != 0 && self.navigation != settings.navigation {
                return false;
            }
        }
        if self.screen_size() != 0 {
            if self.screen_width != 0 && self.screen_width > settings.screen_width {
                return false;
            }
            if self.screen_height != 0 && self.screen_height > settings.screen_height {
                return false;
            }
        }
        if self.version() != 0 {
            if self.sdk_version != 0 && self.sdk_version > settings.sdk_version {
                return false;
            }
            if self.minor_version != 0 && self.minor_version != settings.minor_version {
                return false;
            }
        }
        true
    }

    /// Whether this configuration is a better fit for `requested` than `o`.
    ///
    /// Both configurations are expected to match `requested`.
    pub fn is_better_than(&self, o: &Config, requested: &Config) -> bool {
        if self.imsi() != 0 || o.imsi() != 0 {
            if self.mcc != o.mcc && requested.mcc != 0 {
                return self.mcc != 0;
            }
            if self.mnc != o.mnc && requested.mnc != 0 {
                return self.mnc != 0;
            }
        }

        if self.is_locale_better_than(o, requested) {
            return true;
        } else if o.is_locale_better_than(self, requested) {
            return false;
        }

        if self.grammatical_inflection != o.grammatical_inflection
            && requested.grammatical_inflection != 0
        {
            return self.grammatical_inflection != 0;
        }

        if (self.screen_layout != 0 || o.screen_layout != 0)
            && (self.screen_layout ^ o.screen_layout) & Config::MASK_LAYOUTDIR != 0
            && requested.screen_layout & Config::MASK_LAYOUTDIR != 0
        {
            let my_dir = self.screen_layout & Config::MASK_LAYOUTDIR;
            let o_dir = o.screen_layout & Config::MASK_LAYOUTDIR;
            return my_dir > o_dir;
        }

        // Larger widths were filtered out by `matches`, so the largest is closest.
        if (self.smallest_screen_width_dp != 0 || o.smallest_screen_width_dp != 0)
            && self.smallest_screen_width_dp != o.smallest_screen_width_dp
        {
            return self.smallest_screen_width_dp > o.smallest_screen_width_dp;
        }

        if self.screen_size_dp() != 0 || o.screen_size_dp() != 0 {
            // An unset dimension yields a large delta, so a set one is preferred.
            let mut my_delta = 0i32;
            let mut o_delta = 0i32;
            if requested.screen_width_dp != 0 {
                my_delta += requested.screen_width_dp as i32 - self.screen_width_dp as i32;
                o_delta += requested.screen_width_dp as i32 - o.screen_width_dp as i32;
            }
            if requested.screen_height_dp != 0 {
                my_delta += requested.screen_height_dp as i32 - self.screen_height_dp as i32;
                o_delta += requested.screen_height_dp as i32 - o.screen_height_dp as i32;
            }
            if my_delta != o_delta {
                return my_delta < o_delta;
            }
        }

        if self.screen_layout != 0 || o.screen_layout != 0 {
            let requested_size = requested.screen_layout & Config::MASK_SCREENSIZE;
            if (self.screen_layout ^ o.screen_layout) & Config::MASK_SCREENSIZE != 0
                && requested_size != 0
            {
                // Undefined counts as normal once the device is at least normal.
                let my_size = self.screen_layout & Config::MASK_SCREENSIZE;
                let o_size = o.screen_layout & Config::MASK_SCREENSIZE;
                let mut fixed_my_size = my_size;
                let mut fixed_o_size = o_size;
                if requested_size >= Config::SCREENSIZE_NORMAL {
                    if fixed_my_size == 0 {
                        fixed_my_size = Config::SCREENSIZE_NORMAL;
                    }
                    if fixed_o_size == 0 {
                        fixed_o_size = Config::SCREENSIZE_NORMAL;
                    }
                }
                if fixed_my_size == fixed_o_size {
                    return my_size != 0;
                }
                return fixed_my_size > fixed_o_size;
            }
            if (self.screen_layout ^ o.screen_layout) & Config::MASK_SCREENLONG != 0
                && requested.screen_layout & Config::MASK_SCREENLONG != 0
            {
                return self.screen_layout & Config::MASK_SCREENLONG != 0;
            }
        }

        if (self.screen_layout2 != 0 || o.screen_layout2 != 0)
            && (self.screen_layout2 ^ o.screen_layout2) & Config::MASK_SCREENROUND != 0
            && requested.screen_layout2 & Config::MASK_SCREENROUND != 0
        {
            return self.screen_layout2 & Config::MASK_SCREENROUND != 0;
        }

        if self.color_mode != 0 || o.color_mode != 0 {
            if (self.color_mode ^ o.color_mode) & Config::MASK_WIDE_COLOR_GAMUT != 0
                && requested.color_mode & Config::MASK_WIDE_COLOR_GAMUT != 0
            {
                return self.color_mode & Config::MASK_WIDE_COLOR_GAMUT != 0;
            }
            if (self.color_mode ^ o.color_mode) & Config::MASK_HDR != 0
                && requested.color_mode & Config::MASK_HDR != 0
            {
                return self.color_mode & Config::MASK_HDR != 0;
            }
        }

        if self.orientation != o.orientation && requested.orientation != 0 {
            return self.orientation != 0;
        }

        if self.ui_mode != 0 || o.ui_mode != 0 {
            if (self.ui_mode ^ o.ui_mode) & Config::MASK_UI_MODE_TYPE != 0
                && requested.ui_mode & Config::MASK_UI_MODE_TYPE != 0
            {
                return self.ui_mode & Config::MASK_UI_MODE_TYPE != 0;
            }
            if (self.ui_mode ^ o.ui_mode) & Config::MASK_UI_MODE_NIGHT != 0
                && requested.ui_mode & Config::MASK_UI_MODE_NIGHT != 0
            {
                return self.ui_mode & Config::MASK_UI_MODE_NIGHT != 0;
            }
        }

        if self.screen_type() != 0 || o.screen_type() != 0 {
            // Unset density counts as medium and does not decide on its own.
            if self.effective_density() != o.effective_density() {
                return self.is_density_better_than(o, requested);
            }
            if self.touchscreen != o.touchscreen && requested.touchscreen != 0 {
                return self.touchscreen != 0;
            }
        }

        if self.input() != 0 || o.input() != 0 {
            let keys_hidden = self.input_flags & Config::MASK_KEYSHIDDEN;
            let o_keys_hidden = o.input_flags & Config::MASK_KEYSHIDDEN;
            let req_keys_hidden = requested.input_flags & Config::MASK_KEYSHIDDEN;
            if keys_hidden != o_keys_hidden && req_keys_hidden != 0 {
                if keys_hidden == 0 {
                    return false;
                }
                if o_keys_hidden == 0 {
                    return true;
                }
                // Exposed and soft both match a soft request; the exact one wins.
                if req_keys_hidden == keys_hidden {
                    return true;
                }
                if req_keys_hidden == o_keys_hidden {
                    return false;
                }
            }

            if self.keyboard != o.keyboard && requested.keyboard != 0 {
                return self.keyboard != 0;
            }

            let nav_hidden = self.input_flags & Config::MASK_NAVHIDDEN;
            let o_nav_hidden = o.input_flags & Config::MASK_NAVHIDDEN;
            if nav_hidden != o_nav_hidden && requested.input_flags & Config::MASK_NAVHIDDEN != 0 {
                if nav_hidden == 0 {
                    return false;
                }
                if o_nav_hidden == 0 {
                    return true;
                }
            }

            if self.navigation != o.navigation && requested.navigation != 0 {
                return self.navigation != 0;
            }
        }

        if self.screen_size() != 0 || o.screen_size() != 0 {
            let mut my_delta = 0i32;
            let mut o_delta = 0i32;
            if requested.screen_width != 0 {
                my_delta += requested.screen_width as i32 - self.screen_width as i32;
                o_delta += requested.screen_width as i32 - o.screen_width as i32;
            }
            if requested.screen_height != 0 {
                my_delta += requested.screen_height as i32 - self.screen_height as i32;
                o_delta += requested.screen_height as i32 - o.screen_height as i32;
            }
            if my_delta != o_delta {
                return my_delta < o_delta;
            }
        }

        if self.version() != 0 || o.version() != 0 {
            if self.sdk_version != o.sdk_version && requested.sdk_version != 0 {
                return self.sdk_version > o.sdk_version;
            }
            if self.minor_version != o.minor_version && requested.minor_version != 0 {
                return self.minor_version != 0;
            }
        }

        false
    }

    fn effective_density(&self) -> u16 {
        match self.density {
            0 => Config::DENSITY_MEDIUM,
            density => density,
        }
    }

    /// Picks between two different densities. Any density can be scaled, but
    /// scaling down is preferred over scaling up.
    fn is_density_better_than(&self, o: &Config, requested: &Config) -> bool {
        let this_density = self.effective_density() as i32;
        let other_density = o.effective_density() as i32;
        if this_density == other_density {
            return false;
        }
        if this_density == Config::DENSITY_ANY as i32 {
            return true;
        } else if other_density == Config::DENSITY_ANY as i32 {
            return false;
        }

        let requested_density = match requested.density {
            0 | Config::DENSITY_ANY => Config::DENSITY_MEDIUM,
            density => density,
        } as i32;

        let (mut l, mut h) = (other_density, this_density);
        let mut im_bigger = true;
        if l > h {
            std::mem::swap(&mut l, &mut h);
            im_bigger = false;
        }
        if requested_density >= h {
            return im_bigger;
        }
        if l >= requested_density {
            return !im_bigger;
        }
        // Scaling down counts as twice as good as scaling up.
        if (2 * l - requested_density) * h > requested_density * requested_density {
            !im_bigger
        } else {
            im_bigger
        }
    }

    fn is_locale_better_than(&self, o: &Config, requested: &Config) -> bool {
        if requested.locale() == 0 {
            return false;
        }
        if self.locale() == 0
            && o.locale() == 0
            && self.locale_numbering_system[0] == 0
            && o.locale_numbering_system[0] == 0
        {
            return false;
        }

        if !langs_are_equivalent(self.language, o.language) {
            // Only one of the two has a language. No-language resources are
            // where US English traditionally lives.
            if requested.language == ENGLISH && requested.region == UNITED_STATES {
                if self.language[0] != 0 {
                    return self.region[0] == 0 || self.region == UNITED_STATES;
                } else {
                    return !(o.region[0] == 0 || o.region == UNITED_STATES);
                }
            }
            return self.language[0] != 0;
        }

        let region = compare_regions(self.region, o.region, requested.region);
        if region != 0 {
            return region > 0;
        }

        let script_matches = self.locale_script[0] != 0
            && !self.locale_script_was_computed
            && self.locale_script == requested.locale_script;
        let o_script_matches = o.locale_script[0] != 0
            && !o.locale_script_was_computed
            && o.locale_script == requested.locale_script;
        if script_matches != o_script_matches {
            return script_matches;
        }

        let variant_matches = self.locale_variant == requested.locale_variant;
        let o_variant_matches = o.locale_variant == requested.locale_variant;
        if variant_matches != o_variant_matches {
            return variant_matches;
        }

        let numbers_match = self.locale_numbering_system == requested.locale_numbering_system;
        let o_numbers_match = o.locale_numbering_system == requested.locale_numbering_system;
        if numbers_match != o_numbers_match {
            return numbers_match;
        }

        // Equivalent languages (tl and fil) prefer the identical one.
        self.language == requested.language && o.language != requested.language
    }

    /// Whether this configuration sets an axis `o` leaves open, comparing axes
    /// in priority order. Used when there is no requested configuration.
    pub fn is_more_specific_than(&self, o: &Config) -> bool {
        fn set_first(a: bool, b: bool) -> Option<bool> {
            match (a, b) {
                (false, true) => Some(false),
                (true, false) => Some(true),
                _ => None,
            }
        }
        for (a, b) in [(self.mcc != 0, o.mcc != 0), (self.mnc != 0, o.mnc != 0)] {
            if let Some(wins) = set_first(a, b) {
                return wins;
            }
        }
        let locale = self.locale_specificity(o);
        if locale != 0 {
            return locale > 0;
        }
        let masked = |a: u8, b: u8, mask: u8| (a & mask != 0, b & mask != 0);
        let ordered = [
            (
                self.grammatical_inflection != 0,
                o.grammatical_inflection != 0,
            ),
            masked(self.screen_layout, o.screen_layout, Config::MASK_LAYOUTDIR),
            (
                self.smallest_screen_width_dp != 0,
                o.smallest_screen_width_dp != 0,
            ),
            (self.screen_width_dp != 0, o.screen_width_dp != 0),
            (self.screen_height_dp != 0, o.screen_height_dp != 0),
            masked(self.screen_layout, o.screen_layout, Config::MASK_SCREENSIZE),
            masked(self.screen_layout, o.screen_layout, Config::MASK_SCREENLONG),
            masked(self.screen_layout2, o.screen_layout2, Config::MASK_SCREENROUND),
            masked(self.color_mode, o.color_mode, Config::MASK_HDR),
            masked(self.color_mode, o.color_mode, Config::MASK_WIDE_COLOR_GAMUT),
            (self.orientation != 0, o.orientation != 0),
            masked(self.ui_mode, o.ui_mode, Config::MASK_UI_MODE_TYPE),
            masked(self.ui_mode, o.ui_mode, Config::MASK_UI_MODE_NIGHT),
            // Density is never more specific, the default just means 160.
            (self.touchscreen != 0, o.touchscreen != 0),
            masked(self.input_flags, o.input_flags, Config::MASK_KEYSHIDDEN),
            (self.keyboard != 0, o.keyboard != 0),
            masked(self.input_flags, o.input_flags, Config::MASK_NAVHIDDEN),
            (self.navigation != 0, o.navigation != 0),
            (self.screen_width != 0, o.screen_width != 0),
            (self.screen_height != 0, o.screen_height != 0),
            (self.sdk_version != 0, o.sdk_version != 0),
            (self.minor_version != 0, o.minor_version != 0),
        ];
        for (a, b) in ordered {
            if let Some(wins) = set_first(a, b) {
                return wins;
            }
        }
        false
    }

    /// Positive when this locale is more specific than `o`'s.
    ///
    /// Variants weigh more than scripts, so `en-US-POSIX` beats `en-Latn-US`.
    fn locale_specificity(&self, o: &Config) -> i32 {
        if self.locale() != 0 || o.locale() != 0 {
            if self.language[0] != o.language[0] {
                if self.language[0] == 0 {
                    return -1;
                }
                if o.language[0] == 0 {
                    return 1;
                }
            }
            if self.region[0] != o.region[0] {
                if self.region[0] == 0 {
                    return -1;
                }
                if o.region[0] == 0 {
                    return 1;
                }
            }
        }
        let score = |c: &Config| {
            let script = c.locale_script[0] != 0 && !c.locale_script_was_computed;
            script as i32 + if c.locale_variant[0] != 0 { 2 } else { 0 }
        };
        score(self) - score(o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(f: impl FnOnce(&mut ResourceConfig)) -> ResourceConfig {
        let mut config = ResourceConfig {
            size: ResourceConfig::KNOWN_SIZE as u32,
            ..Default::default()
        };
        f(&mut config);
        config
    }

    fn locale(language: &str, region: &str) -> ResourceConfig {
        config(|c| {
            c.set_language(language);
            c.set_region(region);
        })
    }

    fn samples() -> Vec<ResourceConfig> {
        vec![
            ResourceConfig::default(),
            config(|c| c.density = ResourceConfig::DENSITY_HIGH),
            config(|c| c.density = ResourceConfig::DENSITY_ANY),
            config(|c| {
                c.density = ResourceConfig::DENSITY_HIGH;
                c.orientation = ResourceConfig::ORIENTATION_PORT;
            }),
            config(|c| c.orientation = ResourceConfig::ORIENTATION_LAND),
            config(|c| c.mcc = 310),
            config(|c| {
                c.mcc = 310;
                c.mnc = 4;
            }),
            locale("en", ""),
            locale("en", "US"),
            locale("en", "GB"),
            locale("fr", ""),
            config(|c| {
                c.set_language("sr");
                c.locale_script = *b"Latn";
            }),
            config(|c| c.sdk_version = 21),
            config(|c| c.sdk_version = 26),
            config(|c| c.smallest_screen_width_dp = 600),
            config(|c| {
                c.screen_width_dp = 400;
                c.screen_height_dp = 700;
            }),
            config(|c| c.screen_layout = ResourceConfig::SCREENSIZE_LARGE),
            config(|c| c.screen_layout = ResourceConfig::LAYOUTDIR_RTL),
            config(|c| c.ui_mode = ResourceConfig::UI_MODE_NIGHT_YES),
            config(|c| c.ui_mode = ResourceConfig::UI_MODE_TYPE_TELEVISION),
            config(|c| c.input_flags = ResourceConfig::KEYSHIDDEN_NO),
            config(|c| c.input_flags = ResourceConfig::KEYSHIDDEN_SOFT),
            config(|c| c.screen_layout2 = ResourceConfig::SCREENROUND_YES),
            config(|c| c.color_mode = ResourceConfig::HDR_YES),
            config(|c| c.touchscreen = ResourceConfig::TOUCHSCREEN_FINGER),
            config(|c| {
                c.screen_width = 1920;
                c.screen_height = 1080;
            }),
        ]
    }

    fn targets() -> Vec<ResourceConfig> {
        vec![
            ResourceConfig::default(),
            config(|c| {
                c.mcc = 310;
                c.mnc = 4;
                c.set_language("en");
                c.set_region("US");
                c.density = ResourceConfig::DENSITY_XHIGH;
                c.orientation = ResourceConfig::ORIENTATION_PORT;
                c.sdk_version = 30;
                c.smallest_screen_width_dp = 720;
                c.screen_width_dp = 720;
                c.screen_height_dp = 1280;
                c.screen_layout = ResourceConfig::SCREENSIZE_XLARGE
                    | ResourceConfig::LAYOUTDIR_RTL
                    | ResourceConfig::SCREENLONG_YES;
                c.ui_mode =
                    ResourceConfig::UI_MODE_TYPE_TELEVISION | ResourceConfig::UI_MODE_NIGHT_YES;
                c.input_flags = ResourceConfig::KEYSHIDDEN_SOFT;
                c.touchscreen = ResourceConfig::TOUCHSCREEN_FINGER;
                c.screen_layout2 = ResourceConfig::SCREENROUND_YES;
                c.color_mode = ResourceConfig::HDR_YES;
                c.screen_width = 1920;
                c.screen_height = 1080;
            }),
            config(|c| {
                c.set_language("en");
                c.set_region("GB");
                c.density = ResourceConfig::DENSITY_LOW;
                c.screen_layout = ResourceConfig::SCREENSIZE_NORMAL;
            }),
            config(|c| {
                c.set_language("sr");
                c.set_region("RS");
                c.locale_script = *b"Latn";
                c.sdk_version = 21;
            }),
        ]
    }

    #[test]
    fn test_compatibility_is_reflexive() {
        for c in samples().iter().chain(targets().iter()) {
            assert!(is_compatible(c, c), "{c} is not compatible with itself");
        }
    }

    #[test]
    fn test_specificity_is_antisymmetric() {
        for target in targets() {
            let candidates = samples()
                .into_iter()
                .filter(|c| is_compatible(c, &target))
                .collect::<Vec<_>>();
            for a in &candidates {
                assert!(!is_more_specific(a, a, &target));
                for b in &candidates {
                    assert!(
                        !(is_more_specific(a, b, &target) && is_more_specific(b, a, &target)),
                        "{a} and {b} both win for {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_more_specific_orientation_wins() {
        let hdpi = config(|c| c.density = ResourceConfig::DENSITY_HIGH);
        let hdpi_port = config(|c| {
            c.density = ResourceConfig::DENSITY_HIGH;
            c.orientation = ResourceConfig::ORIENTATION_PORT;
        });
        let target = hdpi_port;
        assert_eq!(select_best([&hdpi, &hdpi_port], &target), Some(1));
        assert_eq!(select_best([&hdpi_port, &hdpi], &target), Some(0));
    }

    #[test]
    fn test_ties_keep_first() {
        let a = config(|c| c.density = ResourceConfig::DENSITY_HIGH);
        let b = a;
        let target = config(|c| c.density = ResourceConfig::DENSITY_HIGH);
        assert_eq!(select_best([&a, &b], &target), Some(0));
    }

    #[test]
    fn test_no_compatible_candidate() {
        let land = config(|c| c.orientation = ResourceConfig::ORIENTATION_LAND);
        let v31 = config(|c| c.sdk_version = 31);
        let target = config(|c| {
            c.orientation = ResourceConfig::ORIENTATION_PORT;
            c.sdk_version = 30;
        });
        assert_eq!(select_best([&land, &v31], &target), None);
        assert_eq!(select_best([], &target), None);
    }

    #[test]
    fn test_locale_resolution() {
        let default = ResourceConfig::default();
        let en = locale("en", "");
        let en_gb = locale("en", "GB");
        let en_us = locale("en", "US");
        let fr = locale("fr", "");

        let target = locale("en", "US");
        assert!(!is_compatible(&fr, &target));
        assert!(!is_compatible(&en_gb, &target));
        assert_eq!(
            select_best([&default, &en, &en_gb, &en_us, &fr], &target),
            Some(3)
        );
        assert_eq!(select_best([&default, &en, &fr], &target), Some(1));

        let target = locale("fr", "CA");
        assert_eq!(select_best([&default, &en, &fr], &target), Some(2));
        assert_eq!(select_best([&default, &en], &target), Some(0));
    }

    #[test]
    fn test_script_match() {
        let sr_latn = config(|c| {
            c.set_language("sr");
            c.locale_script = *b"Latn";
        });
        let sr_cyrl = config(|c| {
            c.set_language("sr");
            c.locale_script = *b"Cyrl";
        });
        let target = config(|c| {
            c.set_language("sr");
            c.set_region("RS");
            c.locale_script = *b"Latn";
        });
        assert!(is_compatible(&sr_latn, &target));
        assert!(!is_compatible(&sr_cyrl, &target));
    }

    #[test]
    fn test_density_prefers_scaling_down() {
        let mdpi = config(|c| c.density = ResourceConfig::DENSITY_MEDIUM);
        let hdpi = config(|c| c.density = ResourceConfig::DENSITY_HIGH);
        let xhdpi = config(|c| c.density = ResourceConfig::DENSITY_XHIGH);
        let xxhdpi = config(|c| c.density = ResourceConfig::DENSITY_XXHIGH);
        let any = config(|c| c.density = ResourceConfig::DENSITY_ANY);
        let target = xhdpi;
        assert_eq!(select_best([&mdpi, &hdpi, &xxhdpi], &target), Some(2));
        assert_eq!(select_best([&mdpi, &xhdpi, &xxhdpi], &target), Some(1));
        assert_eq!(select_best([&xhdpi, &any], &target), Some(1));
        // Without a requested density medium is assumed.
        let target = ResourceConfig::default();
        assert_eq!(select_best([&hdpi, &mdpi, &xxhdpi], &target), Some(1));
    }

    #[test]
    fn test_sdk_version() {
        let v21 = config(|c| c.sdk_version = 21);
        let v26 = config(|c| c.sdk_version = 26);
        let v31 = config(|c| c.sdk_version = 31);
        let target = config(|c| c.sdk_version = 30);
        assert_eq!(select_best([&v21, &v26, &v31], &target), Some(1));
    }

    #[test]
    fn test_mcc_beats_locale() {
        let mcc = config(|c| c.mcc = 310);
        let en = locale("en", "");
        let target = config(|c| {
            c.mcc = 310;
            c.set_language("en");
        });
        assert_eq!(select_best([&en, &mcc], &target), Some(1));
    }

    #[test]
    fn test_smallest_width() {
        let sw600 = config(|c| c.smallest_screen_width_dp = 600);
        let sw720 = config(|c| c.smallest_screen_width_dp = 720);
        let sw800 = config(|c| c.smallest_screen_width_dp = 800);
        let target = config(|c| c.smallest_screen_width_dp = 768);
        assert!(!is_compatible(&sw800, &target));
        assert_eq!(select_best([&sw600, &sw720, &sw800], &target), Some(1));
    }

    #[test]
    fn test_soft_keyboard_accepts_exposed() {
        let exposed = config(|c| c.input_flags = ResourceConfig::KEYSHIDDEN_NO);
        let soft = config(|c| c.input_flags = ResourceConfig::KEYSHIDDEN_SOFT);
        let target = soft;
        assert!(is_compatible(&exposed, &target));
        assert_eq!(select_best([&exposed, &soft], &target), Some(1));
    }

    #[test]
    fn test_keyboard_before_nav_hidden() {
        let nav_exposed = config(|c| c.input_flags = ResourceConfig::NAVHIDDEN_NO);
        let qwerty = config(|c| c.keyboard = ResourceConfig::KEYBOARD_QWERTY);
        let target = config(|c| {
            c.keyboard = ResourceConfig::KEYBOARD_QWERTY;
            c.input_flags = ResourceConfig::NAVHIDDEN_NO;
        });
        assert!(is_compatible(&nav_exposed, &target));
        assert!(is_compatible(&qwerty, &target));
        assert_eq!(select_best([&nav_exposed, &qwerty], &target), Some(1));
        assert_eq!(select_best([&qwerty, &nav_exposed], &target), Some(0));
        assert!(qwerty.is_more_specific_than(&nav_exposed));
        assert!(!nav_exposed.is_more_specific_than(&qwerty));
    }

    #[test]
    fn test_unset_density_falls_through_to_touchscreen() {
        let medium = config(|c| c.density = ResourceConfig::DENSITY_MEDIUM);
        let finger = config(|c| c.touchscreen = ResourceConfig::TOUCHSCREEN_FINGER);
        let target = config(|c| c.touchscreen = ResourceConfig::TOUCHSCREEN_FINGER);
        assert_eq!(select_best([&medium, &finger], &target), Some(1));
        assert_eq!(select_best([&finger, &medium], &target), Some(0));
        assert!(is_more_specific(&finger, &medium, &target));
        assert!(!is_more_specific(&medium, &finger, &target));
    }

    #[test]
    fn test_defaulted_fields_do_not_constrain() {
        let early = ResourceConfig {
            size: 28,
            density: ResourceConfig::DENSITY_HIGH,
            ..Default::default()
        };
        let target = config(|c| {
            c.density = ResourceConfig::DENSITY_HIGH;
            c.smallest_screen_width_dp = 411;
            c.screen_layout2 = ResourceConfig::SCREENROUND_NO;
            c.locale_script = *b"Latn";
        });
        assert!(is_compatible(&early, &target));
    }

    #[test]
    fn test_more_specific_without_target() {
        let port = config(|c| c.orientation = ResourceConfig::ORIENTATION_PORT);
        let en = locale("en", "");
        let en_us = locale("en", "US");
        let default = ResourceConfig::default();
        assert!(port.is_more_specific_than(&default));
        assert!(!default.is_more_specific_than(&port));
        assert!(en.is_more_specific_than(&port));
        assert!(en_us.is_more_specific_than(&en));
        assert!(!en.is_more_specific_than(&en_us));
    }
}
