use std::fmt::{self, Display};

use crate::layer::{LayerStructure, ShapeMap};

pub fn ansi<T: Display, U: Display>(x: T, y: U) -> String {
    format!("\x1b[{y}m{x}\x1b[0m")
}

pub fn display_passed(pass: bool) -> bool {
    if pass {
        println!("{}", ansi("pass", "32;1"));
    } else {
        println!("{}", ansi("fail", 31));
    }

    pass
}

/// Plain-text summary of a layer: parameter views, parameter count,
/// input shapes and output shapes.
pub fn layer_info_string(name: &str, in_shapes: &ShapeMap, structure: &LayerStructure) -> String {
    LayerInfo { name, in_shapes, structure }.to_string()
}

struct LayerInfo<'a> {
    name: &'a str,
    in_shapes: &'a ShapeMap,
    structure: &'a LayerStructure,
}

impl Display for LayerInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;

        for (view, shape) in &self.structure.parameters {
            writeln!(f, "\t{view} {shape}")?;
        }

        writeln!(f, "number of parameters: {}", self.structure.num_parameters())?;

        writeln!(f, "input shapes:")?;
        for (view, shape) in self.in_shapes {
            writeln!(f, "\t{view} {shape}")?;
        }

        writeln!(f, "output shapes:")?;
        for (view, shape) in &self.structure.outputs {
            writeln!(f, "\t{view} {shape}")?;
        }

        Ok(())
    }
}

pub fn report_layer_info(name: &str, in_shapes: &ShapeMap, structure: &LayerStructure) {
    println!("{}", ansi(name, "34;1"));

    for (view, shape) in &structure.parameters {
        println!("\t{view} {}", ansi(shape, 36));
    }

    println!("number of parameters: {}", ansi(structure.num_parameters(), 36));

    println!("input shapes:");
    for (view, shape) in in_shapes {
        println!("\t{view} {}", ansi(shape, 36));
    }

    println!("output shapes:");
    for (view, shape) in &structure.outputs {
        println!("\t{view} {}", ansi(shape, 36));
    }
}
