// 5-axis G-code output: G1 X Y Z A B, one move per toolpath sample

use crate::toolpath::{OrientedSample, Toolpath};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Linear unit system announced in the program header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Millimeters,
    Inches,
}

impl Units {
    /// Unit selection command (`G21` / `G20`)
    pub fn gcode(&self) -> &'static str {
        match self {
            Units::Millimeters => "G21",
            Units::Inches => "G20",
        }
    }
}

/// Turns a toolpath into a 5-axis G-code program.
///
/// Output layout: tool comments, unit/positioning/feed-mode header and feed
/// rate, one `G1` per sample, then the end-of-program footer. No geometry is
/// computed here; positions and A/B angles are printed as they are.
#[derive(Debug, Clone)]
pub struct GCodeGenerator {
    /// Feed rate in length units per minute
    pub feed_rate: f64,
    pub units: Units,
}

impl Default for GCodeGenerator {
    fn default() -> Self {
        Self {
            feed_rate: 1000.0,
            units: Units::Millimeters,
        }
    }
}

impl GCodeGenerator {
    pub fn new(feed_rate: f64, units: Units) -> Self {
        Self { feed_rate, units }
    }

    /// Program lines in output order
    pub fn lines<'a>(&'a self, toolpath: &'a Toolpath) -> impl Iterator<Item = String> + 'a {
        let start = (!toolpath.is_empty()).then(|| "; Start of toolpath".to_string());

        self.header()
            .into_iter()
            .chain(start)
            .chain(toolpath.iter().map(motion_line))
            .chain(footer())
    }

    /// Generate the program as individual lines
    pub fn generate_lines(&self, toolpath: &Toolpath) -> Vec<String> {
        self.lines(toolpath).collect()
    }

    /// Generate the program as a single newline-separated string
    pub fn generate(&self, toolpath: &Toolpath) -> String {
        self.generate_lines(toolpath).join("\n")
    }

    /// Stream the program into `out`, byte-identical to [`generate`](Self::generate)
    pub fn write_to<W: Write>(&self, toolpath: &Toolpath, mut out: W) -> Result<()> {
        for (i, line) in self.lines(toolpath).enumerate() {
            if i > 0 {
                out.write_all(b"\n")?;
            }
            out.write_all(line.as_bytes())?;
        }

        out.flush()?;
        Ok(())
    }

    fn header(&self) -> Vec<String> {
        vec![
            "; 5-Axis DED Slicer G-code".to_string(),
            "; Continuous path with normal-aligned nozzle".to_string(),
            String::new(),
            self.units.gcode().to_string(),
            "G90".to_string(), // Absolute positioning
            "G94".to_string(), // Feed rate per minute
            format!("F{:?}", self.feed_rate),
            String::new(),
        ]
    }
}

fn footer() -> Vec<String> {
    vec![
        String::new(),
        "; End of toolpath".to_string(),
        "M30".to_string(), // Program end
    ]
}

/// `G1 X.. Y.. Z.. A.. B..` with 3 decimals on every axis
fn motion_line(sample: &OrientedSample) -> String {
    let p = sample.position();
    format!(
        "G1 X{:.3} Y{:.3} Z{:.3} A{:.3} B{:.3}",
        p.x,
        p.y,
        p.z,
        sample.a_angle(),
        sample.b_angle()
    )
}
