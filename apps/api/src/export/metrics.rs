//! Static Times font metrics and greedy word wrap for PDF layout.
//!
//! Widths are the Adobe core-font AFM advances divided by 1000, i.e. em units.
//! The PDF builtin fonts use exactly these advances, so wrapped lines fit the page.
//! Tables cover ASCII 0x20..=0x7E. Index = (char as usize) - 32.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Static character-width table for one Times style.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Width of `s` in points at `font_size_pt`.
    pub fn measure_pt(&self, s: &str, font_size_pt: f32) -> f32 {
        self.measure_str(s) * font_size_pt
    }
}

static TIMES_ROMAN: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.333, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0-9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.50,
    space_width: 0.250,
};

static TIMES_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.555, 0.500, 0.500, 1.000, 0.833, 0.333, 0.333, 0.333, 0.500, 0.570, 0.250, 0.333, 0.250, 0.278,
        // 0-9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.570, 0.570, 0.570, 0.500, 0.930,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.778, 0.389, 0.500, 0.778, 0.667, 0.944,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.611, 0.778, 0.722, 0.556, 0.667, 0.722, 0.722, 1.000, 0.722, 0.722, 0.667,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.581, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.500, 0.556, 0.444, 0.556, 0.444, 0.333, 0.500, 0.556, 0.278, 0.333, 0.556, 0.278, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.500, 0.556, 0.556, 0.444, 0.389, 0.333, 0.556, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.394, 0.220, 0.394, 0.520,
    ],
    average_char_width: 0.53,
    space_width: 0.250,
};

pub fn metrics_for(style: FontStyle) -> &'static FontMetricTable {
    match style {
        FontStyle::Regular => &TIMES_ROMAN,
        FontStyle::Bold => &TIMES_BOLD,
    }
}

/// Greedy word wrap: each line takes as many words as fit in `max_width_pt`.
///
/// A single word wider than the line gets a line to itself rather than being split.
pub fn wrap_lines(text: &str, style: FontStyle, font_size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let table = metrics_for(style);
    let space = table.space_width * font_size_pt;

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_width = table.measure_pt(word, font_size_pt);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width > max_width_pt {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
