//! Summary of a HAIR file for the `info` command.

use serde::Serialize;
use strand_hair::HairFile;

/// What `strand info` reports.
#[derive(Debug, Clone, Serialize)]
pub struct HairSummary {
    pub curves: usize,
    pub nodes: usize,
    pub segments: usize,
    pub arrays: Vec<String>,
    pub default_segments: u32,
    pub default_thickness: f32,
    pub default_color: [f64; 3],
    pub info: String,
    pub bounds: Option<[[f64; 3]; 2]>,
}

impl HairSummary {
    pub fn new(file: &HairFile) -> Self {
        let header = &file.header;
        let curves = &file.curves;
        let bounds = curves.bounds();
        Self {
            curves: curves.curve_count(),
            nodes: curves.node_count(),
            segments: curves.segment_count(),
            arrays: header
                .descriptor
                .iter_names()
                .map(|(name, _)| name.to_lowercase())
                .collect(),
            default_segments: header.default_segments,
            default_thickness: header.default_thickness,
            default_color: header.default_color.into(),
            info: header.info.clone(),
            bounds: (!bounds.is_empty()).then(|| [bounds.min.into(), bounds.max.into()]),
        }
    }

    /// Human-readable report.
    pub fn print(&self, name: &str) {
        println!("HAIR file: {}", name);
        println!("  Curves: {}", self.curves);
        println!("  Nodes: {}", self.nodes);
        println!("  Segments: {}", self.segments);
        println!("  Arrays: {}", self.arrays.join(", "));
        if !self.arrays.iter().any(|a| a == "segments") {
            println!("  Default segments: {}", self.default_segments);
        }
        if !self.arrays.iter().any(|a| a == "thickness") {
            println!("  Default thickness: {}", self.default_thickness);
        }
        if !self.arrays.iter().any(|a| a == "color") {
            let [r, g, b] = self.default_color;
            println!("  Default color: ({:.3}, {:.3}, {:.3})", r, g, b);
        }
        if !self.info.is_empty() {
            println!("  Info: {}", self.info);
        }
        match self.bounds {
            Some([min, max]) => {
                println!("\nBounds:");
                println!("  Min: ({:.4}, {:.4}, {:.4})", min[0], min[1], min[2]);
                println!("  Max: ({:.4}, {:.4}, {:.4})", max[0], max[1], max[2]);
            }
            None => println!("\nNo segments"),
        }
    }
}
