//! The device configuration record attached to every type chunk.
//!
//! Writers from different platform releases emit records of different sizes.
//! Decoding copies the declared bytes into a zero-filled record of the newest
//! known layout, so every field the writer did not emit reads as unset.
use crate::error::{ArscError, Result};
use crate::reader::Region;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ResourceConfig {
    /// Declared size of the record in bytes.
    pub size: u32,
    pub mcc: u16,
    pub mnc: u16,
    /// Two ASCII letters, or a packed three letter code when the high bit of
    /// the first byte is set.
    pub language: [u8; 2],
    /// Two ASCII letters, or a packed three digit code.
    pub region: [u8; 2],
    pub orientation: u8,
    pub touchscreen: u8,
    pub density: u16,
    pub keyboard: u8,
    pub navigation: u8,
    pub input_flags: u8,
    pub grammatical_inflection: u8,
    pub screen_width: u16,
    pub screen_height: u16,
    pub sdk_version: u16,
    pub minor_version: u16,
    pub screen_layout: u8,
    pub ui_mode: u8,
    pub smallest_screen_width_dp: u16,
    pub screen_width_dp: u16,
    pub screen_height_dp: u16,
    pub locale_script: [u8; 4],
    pub locale_variant: [u8; 8],
    pub screen_layout2: u8,
    pub color_mode: u8,
    pub locale_script_was_computed: bool,
    pub locale_numbering_system: [u8; 8],
}

impl ResourceConfig {
    /// Size of the newest layout this decoder knows about.
    pub const KNOWN_SIZE: usize = 64;

    pub const ORIENTATION_PORT: u8 = 0x01;
    pub const ORIENTATION_LAND: u8 = 0x02;
    pub const ORIENTATION_SQUARE: u8 = 0x03;

    pub const TOUCHSCREEN_NOTOUCH: u8 = 0x01;
    pub const TOUCHSCREEN_STYLUS: u8 = 0x02;
    pub const TOUCHSCREEN_FINGER: u8 = 0x03;

    pub const DENSITY_DEFAULT: u16 = 0;
    pub const DENSITY_LOW: u16 = 120;
    pub const DENSITY_MEDIUM: u16 = 160;
    pub const DENSITY_TV: u16 = 213;
    pub const DENSITY_HIGH: u16 = 240;
    pub const DENSITY_XHIGH: u16 = 320;
    pub const DENSITY_XXHIGH: u16 = 480;
    pub const DENSITY_XXXHIGH: u16 = 640;
    pub const DENSITY_ANY: u16 = 0xfffe;
    pub const DENSITY_NONE: u16 = 0xffff;

    pub const KEYBOARD_NOKEYS: u8 = 0x01;
    pub const KEYBOARD_QWERTY: u8 = 0x02;
    pub const KEYBOARD_12KEY: u8 = 0x03;

    pub const NAVIGATION_NONAV: u8 = 0x01;
    pub const NAVIGATION_DPAD: u8 = 0x02;
    pub const NAVIGATION_TRACKBALL: u8 = 0x03;
    pub const NAVIGATION_WHEEL: u8 = 0x04;

    pub const MASK_KEYSHIDDEN: u8 = 0x03;
    pub const KEYSHIDDEN_NO: u8 = 0x01;
    pub const KEYSHIDDEN_YES: u8 = 0x02;
    pub const KEYSHIDDEN_SOFT: u8 = 0x03;

    pub const MASK_NAVHIDDEN: u8 = 0x0c;
    pub const NAVHIDDEN_NO: u8 = 0x04;
    pub const NAVHIDDEN_YES: u8 = 0x08;

    pub const GRAMMATICAL_GENDER_NEUTER: u8 = 1;
    pub const GRAMMATICAL_GENDER_FEMININE: u8 = 2;
    pub const GRAMMATICAL_GENDER_MASCULINE: u8 = 3;

    pub const MASK_SCREENSIZE: u8 = 0x0f;
    pub const SCREENSIZE_SMALL: u8 = 0x01;
    pub const SCREENSIZE_NORMAL: u8 = 0x02;
    pub const SCREENSIZE_LARGE: u8 = 0x03;
    pub const SCREENSIZE_XLARGE: u8 = 0x04;

    pub const MASK_SCREENLONG: u8 = 0x30;
    pub const SCREENLONG_NO: u8 = 0x10;
    pub const SCREENLONG_YES: u8 = 0x20;

    pub const MASK_LAYOUTDIR: u8 = 0xc0;
    pub const LAYOUTDIR_LTR: u8 = 0x40;
    pub const LAYOUTDIR_RTL: u8 = 0x80;

    pub const MASK_UI_MODE_TYPE: u8 = 0x0f;
    pub const UI_MODE_TYPE_NORMAL: u8 = 0x01;
    pub const UI_MODE_TYPE_DESK: u8 = 0x02;
    pub const UI_MODE_TYPE_CAR: u8 = 0x03;
    pub const UI_MODE_TYPE_TELEVISION: u8 = 0x04;
    pub const UI_MODE_TYPE_APPLIANCE: u8 = 0x05;
    pub const UI_MODE_TYPE_WATCH: u8 = 0x06;
    pub const UI_MODE_TYPE_VR_HEADSET: u8 = 0x07;

    pub const MASK_UI_MODE_NIGHT: u8 = 0x30;
    pub const UI_MODE_NIGHT_NO: u8 = 0x10;
    pub const UI_MODE_NIGHT_YES: u8 = 0x20;

    pub const MASK_SCREENROUND: u8 = 0x03;
    pub const SCREENROUND_NO: u8 = 0x01;
    pub const SCREENROUND_YES: u8 = 0x02;

    pub const MASK_WIDE_COLOR_GAMUT: u8 = 0x03;
    pub const WIDE_COLOR_GAMUT_NO: u8 = 0x01;
    pub const WIDE_COLOR_GAMUT_YES: u8 = 0x02;

    pub const MASK_HDR: u8 = 0x0c;
    pub const HDR_NO: u8 = 0x04;
    pub const HDR_YES: u8 = 0x08;

    // Bits of the per-entry change masks stored in type spec chunks.
    pub const CONFIG_MCC: u32 = 0x0001;
    pub const CONFIG_MNC: u32 = 0x0002;
    pub const CONFIG_LOCALE: u32 = 0x0004;
    pub const CONFIG_TOUCHSCREEN: u32 = 0x0008;
    pub const CONFIG_KEYBOARD: u32 = 0x0010;
    pub const CONFIG_KEYBOARD_HIDDEN: u32 = 0x0020;
    pub const CONFIG_NAVIGATION: u32 = 0x0040;
    pub const CONFIG_ORIENTATION: u32 = 0x0080;
    pub const CONFIG_DENSITY: u32 = 0x0100;
    pub const CONFIG_SCREEN_SIZE: u32 = 0x0200;
    pub const CONFIG_VERSION: u32 = 0x0400;
    pub const CONFIG_SCREEN_LAYOUT: u32 = 0x0800;
    pub const CONFIG_UI_MODE: u32 = 0x1000;
    pub const CONFIG_SMALLEST_SCREEN_SIZE: u32 = 0x2000;
    pub const CONFIG_LAYOUTDIR: u32 = 0x4000;
    pub const CONFIG_SCREEN_ROUND: u32 = 0x8000;
    pub const CONFIG_COLOR_MODE: u32 = 0x10000;
    pub const CONFIG_GRAMMATICAL_GENDER: u32 = 0x20000;

    /// Decodes the record at the start of `region`.
    pub fn decode(region: Region<'_>) -> Result<Self> {
        let offset = region.start();
        let size = region
            .read_u32(0)
            .map_err(|_| ArscError::malformed_config(offset, "missing size field"))?;
        if size < 4 {
            return Err(ArscError::malformed_config(
                offset,
                format!("size {size} cannot hold its own size field"),
            ));
        }
        if size as usize > region.len() {
            return Err(ArscError::malformed_config(
                offset,
                format!("size {size} exceeds the {} bytes available", region.len()),
            ));
        }
        let mut raw = [0u8; Self::KNOWN_SIZE];
        let known = (size as usize).min(Self::KNOWN_SIZE);
        raw[..known].copy_from_slice(region.bytes(0, known)?);

        let mut r = Region::new(&raw).reader(4);
        let mut config = Self {
            size,
            ..Default::default()
        };
        config.mcc = r.read_u16()?;
        config.mnc = r.read_u16()?;
        config.language.copy_from_slice(r.read_bytes(2)?);
        config.region.copy_from_slice(r.read_bytes(2)?);
        config.orientation = r.read_u8()?;
        config.touchscreen = r.read_u8()?;
        config.density = r.read_u16()?;
        config.keyboard = r.read_u8()?;
        config.navigation = r.read_u8()?;
        config.input_flags = r.read_u8()?;
        config.grammatical_inflection = r.read_u8()?;
        config.screen_width = r.read_u16()?;
        config.screen_height = r.read_u16()?;
        config.sdk_version = r.read_u16()?;
        config.minor_version = r.read_u16()?;
        config.screen_layout = r.read_u8()?;
        config.ui_mode = r.read_u8()?;
        config.smallest_screen_width_dp = r.read_u16()?;
        config.screen_width_dp = r.read_u16()?;
        config.screen_height_dp = r.read_u16()?;
        config.locale_script.copy_from_slice(r.read_bytes(4)?);
        config.locale_variant.copy_from_slice(r.read_bytes(8)?);
        config.screen_layout2 = r.read_u8()?;
        config.color_mode = r.read_u8()?;
        let _screen_config_pad2 = r.read_u16()?;
        config.locale_script_was_computed = r.read_u8()? != 0;
        config.locale_numbering_system.copy_from_slice(r.read_bytes(8)?);
        Ok(config)
    }

    pub(crate) fn imsi(&self) -> u32 {
        self.mcc as u32 | (self.mnc as u32) << 16
    }

    pub(crate) fn locale(&self) -> u32 {
        u32::from_le_bytes([
            self.language[0],
            self.language[1],
            self.region[0],
            self.region[1],
        ])
    }

    pub(crate) fn screen_type(&self) -> u32 {
        self.orientation as u32 | (self.touchscreen as u32) << 8 | (self.density as u32) << 16
    }

    pub(crate) fn input(&self) -> u32 {
        self.keyboard as u32 | (self.navigation as u32) << 8 | (self.input_flags as u32) << 16
    }

    pub(crate) fn screen_size(&self) -> u32 {
        self.screen_width as u32 | (self.screen_height as u32) << 16
    }

    pub(crate) fn version(&self) -> u32 {
        self.sdk_version as u32 | (self.minor_version as u32) << 16
    }

    pub(crate) fn screen_config(&self) -> u32 {
        self.screen_layout as u32
            | (self.ui_mode as u32) << 8
            | (self.smallest_screen_width_dp as u32) << 16
    }

    pub(crate) fn screen_size_dp(&self) -> u32 {
        self.screen_width_dp as u32 | (self.screen_height_dp as u32) << 16
    }

    pub(crate) fn screen_config2(&self) -> u32 {
        self.screen_layout2 as u32 | (self.color_mode as u32) << 8
    }

    /// Language subtag, unpacking three letter codes.
    pub fn language_code(&self) -> String {
        unpack_code(self.language, b'a')
    }

    /// Region subtag, unpacking three digit codes.
    pub fn region_code(&self) -> String {
        unpack_code(self.region, b'0')
    }

    /// Sets the language from a two or three letter lowercase subtag.
    ///
    /// Any other input, including the empty string, resets the language to
    /// "any".
    pub fn set_language(&mut self, language: &str) {
        let code = language.as_bytes();
        self.language = if code.iter().all(u8::is_ascii_lowercase) {
            pack_code(code, b'a')
        } else {
            [0, 0]
        };
    }

    /// Sets the region from a two letter or three digit subtag.
    ///
    /// Any other input, including the empty string, resets the region to
    /// "any".
    pub fn set_region(&mut self, region: &str) {
        self.region = match region.as_bytes() {
            code @ [_, _] if code.iter().all(u8::is_ascii_alphabetic) => pack_code(code, b'0'),
            code @ [_, _, _] if code.iter().all(u8::is_ascii_digit) => pack_code(code, b'0'),
            _ => [0, 0],
        };
    }

    /// Bitmask of `CONFIG_*` axes on which the two records differ.
    pub fn diff(&self, o: &Self) -> u32 {
        let mut diffs = 0;
        if self.mcc != o.mcc {
            diffs |= Self::CONFIG_MCC;
        }
        if self.mnc != o.mnc {
            diffs |= Self::CONFIG_MNC;
        }
        if self.orientation != o.orientation {
            diffs |= Self::CONFIG_ORIENTATION;
        }
        if self.density != o.density {
            diffs |= Self::CONFIG_DENSITY;
        }
        if self.touchscreen != o.touchscreen {
            diffs |= Self::CONFIG_TOUCHSCREEN;
        }
        if (self.input_flags ^ o.input_flags) & (Self::MASK_KEYSHIDDEN | Self::MASK_NAVHIDDEN)
            != 0
        {
            diffs |= Self::CONFIG_KEYBOARD_HIDDEN;
        }
        if self.keyboard != o.keyboard {
            diffs |= Self::CONFIG_KEYBOARD;
        }
        if self.navigation != o.navigation {
            diffs |= Self::CONFIG_NAVIGATION;
        }
        if self.screen_size() != o.screen_size() || self.screen_size_dp() != o.screen_size_dp() {
            diffs |= Self::CONFIG_SCREEN_SIZE;
        }
        if self.version() != o.version() {
            diffs |= Self::CONFIG_VERSION;
        }
        if (self.screen_layout ^ o.screen_layout) & Self::MASK_LAYOUTDIR != 0 {
            diffs |= Self::CONFIG_LAYOUTDIR;
        }
        if (self.screen_layout ^ o.screen_layout) & !Self::MASK_LAYOUTDIR != 0 {
            diffs |= Self::CONFIG_SCREEN_LAYOUT;
        }
        if (self.screen_layout2 ^ o.screen_layout2) & Self::MASK_SCREENROUND != 0 {
            diffs |= Self::CONFIG_SCREEN_ROUND;
        }
        if (self.color_mode ^ o.color_mode) & (Self::MASK_WIDE_COLOR_GAMUT | Self::MASK_HDR) != 0 {
            diffs |= Self::CONFIG_COLOR_MODE;
        }
        if self.ui_mode != o.ui_mode {
            diffs |= Self::CONFIG_UI_MODE;
        }
        if self.smallest_screen_width_dp != o.smallest_screen_width_dp {
            diffs |= Self::CONFIG_SMALLEST_SCREEN_SIZE;
        }
        if self.grammatical_inflection != o.grammatical_inflection {
            diffs |= Self::CONFIG_GRAMMATICAL_GENDER;
        }
        if self.locale() != o.locale()
            || self.locale_script != o.locale_script
            || self.locale_variant != o.locale_variant
            || self.locale_numbering_system != o.locale_numbering_system
        {
            diffs |= Self::CONFIG_LOCALE;
        }
        diffs
    }

    fn write_locale(&self, parts: &mut Vec<String>) {
        if self.language[0] == 0 {
            return;
        }
        let script = ascii_field(&self.locale_script);
        let variant = ascii_field(&self.locale_variant);
        let numbers = ascii_field(&self.locale_numbering_system);
        let language = self.language_code();
        let region = self.region_code();
        if script.is_empty() && variant.is_empty() && numbers.is_empty() && language.len() == 2
        {
            parts.push(language);
            if !region.is_empty() {
                parts.push(format!("r{region}"));
            }
            return;
        }
        let mut tag = format!("b+{language}");
        if !script.is_empty() && !self.locale_script_was_computed {
            tag.push('+');
            tag.push_str(&script);
        }
        if !region.is_empty() {
            tag.push('+');
            tag.push_str(&region);
        }
        if !variant.is_empty() {
            tag.push('+');
            tag.push_str(&variant);
        }
        if !numbers.is_empty() {
            tag.push_str("+u+nu+");
            tag.push_str(&numbers);
        }
        parts.push(tag);
    }
}

fn pack_code(code: &[u8], base: u8) -> [u8; 2] {
    match code {
        [a, b] => [*a, *b],
        [a, b, c] => {
            let first = a.wrapping_sub(base) & 0x7f;
            let second = b.wrapping_sub(base) & 0x7f;
            let third = c.wrapping_sub(base) & 0x7f;
            [0x80 | (third << 2) | (second >> 3), (second << 5) | first]
        }
        _ => [0, 0],
    }
}

fn unpack_code(packed: [u8; 2], base: u8) -> String {
    if packed[0] & 0x80 != 0 {
        let first = packed[1] & 0x1f;
        let second = ((packed[1] & 0xe0) >> 5) + ((packed[0] & 0x03) << 3);
        let third = (packed[0] & 0x7c) >> 2;
        [first, second, third]
            .iter()
            .map(|c| (c + base) as char)
            .collect()
    } else {
        packed
            .iter()
            .take_while(|c| **c != 0)
            .map(|c| *c as char)
            .collect()
    }
}

fn ascii_field(field: &[u8]) -> String {
    field
        .iter()
        .take_while(|c| **c != 0)
        .map(|c| *c as char)
        .collect()
}

/// Renders the qualifiers in resource directory order, e.g. `en-rUS-land-hdpi-v21`.
impl fmt::Display for ResourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];
        if self.mcc != 0 {
            parts.push(format!("mcc{}", self.mcc));
        }
        if self.mnc != 0 {
            parts.push(format!("mnc{}", self.mnc));
        }
        self.write_locale(&mut parts);
        match self.grammatical_inflection {
            Self::GRAMMATICAL_GENDER_NEUTER => parts.push("neuter".into()),
            Self::GRAMMATICAL_GENDER_FEMININE => parts.push("feminine".into()),
            Self::GRAMMATICAL_GENDER_MASCULINE => parts.push("masculine".into()),
            _ => {}
        }
        match self.screen_layout & Self::MASK_LAYOUTDIR {
            Self::LAYOUTDIR_LTR => parts.push("ldltr".into()),
            Self::LAYOUTDIR_RTL => parts.push("ldrtl".into()),
            _ => {}
        }
        if self.smallest_screen_width_dp != 0 {
            parts.push(format!("sw{}dp", self.smallest_screen_width_dp));
        }
        if self.screen_width_dp != 0 {
            parts.push(format!("w{}dp", self.screen_width_dp));
        }
        if self.screen_height_dp != 0 {
            parts.push(format!("h{}dp", self.screen_height_dp));
        }
        match self.screen_layout & Self::MASK_SCREENSIZE {
            Self::SCREENSIZE_SMALL => parts.push("small".into()),
            Self::SCREENSIZE_NORMAL => parts.push("normal".into()),
            Self::SCREENSIZE_LARGE => parts.push("large".into()),
            Self::SCREENSIZE_XLARGE => parts.push("xlarge".into()),
            _ => {}
        }
        match self.screen_layout & Self::MASK_SCREENLONG {
            Self::SCREENLONG_NO => parts.push("notlong".into()),
            Self::SCREENLONG_YES => parts.push("long".into()),
            _ => {}
        }
        match self.screen_layout2 & Self::MASK_SCREENROUND {
            Self::SCREENROUND_NO => parts.push("notround".into()),
            Self::SCREENROUND_YES => parts.push("round".into()),
            _ => {}
        }
        match self.color_mode & Self::MASK_WIDE_COLOR_GAMUT {
            Self::WIDE_COLOR_GAMUT_NO => parts.push("nowidecg".into()),
            Self::WIDE_COLOR_GAMUT_YES => parts.push("widecg".into()),
            _ => {}
        }
        match self.color_mode & Self::MASK_HDR {
            Self::HDR_NO => parts.push("lowdr".into()),
            Self::HDR_YES => parts.push("highdr".into()),
            _ => {}
        }
        match self.orientation {
            Self::ORIENTATION_PORT => parts.push("port".into()),
            Self::ORIENTATION_LAND => parts.push("land".into()),
            Self::ORIENTATION_SQUARE => parts.push("square".into()),
            _ => {}
        }
        match self.ui_mode & Self::MASK_UI_MODE_TYPE {
            Self::UI_MODE_TYPE_DESK => parts.push("desk".into()),
            Self::UI_MODE_TYPE_CAR => parts.push("car".into()),
            Self::UI_MODE_TYPE_TELEVISION => parts.push("television".into()),
            Self::UI_MODE_TYPE_APPLIANCE => parts.push("appliance".into()),
            Self::UI_MODE_TYPE_WATCH => parts.push("watch".into()),
            Self::UI_MODE_TYPE_VR_HEADSET => parts.push("vrheadset".into()),
            _ => {}
        }
        match self.ui_mode & Self::MASK_UI_MODE_NIGHT {
            Self::UI_MODE_NIGHT_NO => parts.push("notnight".into()),
            Self::UI_MODE_NIGHT_YES => parts.push("night".into()),
            _ => {}
        }
        match self.density {
            Self::DENSITY_DEFAULT => {}
            Self::DENSITY_LOW => parts.push("ldpi".into()),
            Self::DENSITY_MEDIUM => parts.push("mdpi".into()),
            Self::DENSITY_TV => parts.push("tvdpi".into()),
            Self::DENSITY_HIGH => parts.push("hdpi".into()),
            Self::DENSITY_XHIGH => parts.push("xhdpi".into()),
            Self::DENSITY_XXHIGH => parts.push("xxhdpi".into()),
            Self::DENSITY_XXXHIGH => parts.push("xxxhdpi".into()),
            Self::DENSITY_ANY => parts.push("anydpi".into()),
            Self::DENSITY_NONE => parts.push("nodpi".into()),
            density => parts.push(format!("{density}dpi")),
        }
        match self.touchscreen {
            Self::TOUCHSCREEN_NOTOUCH => parts.push("notouch".into()),
            Self::TOUCHSCREEN_STYLUS => parts.push("stylus".into()),
            Self::TOUCHSCREEN_FINGER => parts.push("finger".into()),
            _ => {}
        }
        match self.input_flags & Self::MASK_KEYSHIDDEN {
            Self::KEYSHIDDEN_NO => parts.push("keysexposed".into()),
            Self::KEYSHIDDEN_YES => parts.push("keyshidden".into()),
            Self::KEYSHIDDEN_SOFT => parts.push("keyssoft".into()),
            _ => {}
        }
        match self.keyboard {
            Self::KEYBOARD_NOKEYS => parts.push("nokeys".into()),
            Self::KEYBOARD_QWERTY => parts.push("qwerty".into()),
            Self::KEYBOARD_12KEY => parts.push("12key".into()),
            _ => {}
        }
        match self.input_flags & Self::MASK_NAVHIDDEN {
            Self::NAVHIDDEN_NO => parts.push("navexposed".into()),
            Self::NAVHIDDEN_YES => parts.push("navhidden".into()),
            _ => {}
        }
        match self.navigation {
            Self::NAVIGATION_NONAV => parts.push("nonav".into()),
            Self::NAVIGATION_DPAD => parts.push("dpad".into()),
            Self::NAVIGATION_TRACKBALL => parts.push("trackball".into()),
            Self::NAVIGATION_WHEEL => parts.push("wheel".into()),
            _ => {}
        }
        if self.screen_size() != 0 {
            parts.push(format!("{}x{}", self.screen_width, self.screen_height));
        }
        if self.sdk_version != 0 {
            if self.minor_version != 0 {
                parts.push(format!("v{}.{}", self.sdk_version, self.minor_version));
            } else {
                parts.push(format!("v{}", self.sdk_version));
            }
        }
        if parts.is_empty() {
            f.write_str("default")
        } else {
            f.write_str(&parts.join("-"))
        }
    }
}
