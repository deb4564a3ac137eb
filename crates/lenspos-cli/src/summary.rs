use console::Style;
use lenspos_core::grid::{Coordinate, CoordinateList};

use crate::job::Job;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    failed: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            failed: Style::new().red().bold(),
        }
    }
}

fn format_coordinate(c: &Coordinate) -> String {
    format!("({:>11.6}, {:>11.6})", c.y, c.x)
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "off".to_string(), |v| format!("{v}"))
}

pub fn print_job_summary(job: &Job, mode: &str) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(format!("lenspos {mode}")));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    let components: Vec<&str> = job.lens.components.iter().map(|c| c.name()).collect();
    println!(
        "  {:<18}{}",
        s.label.apply_to("Lens"),
        s.method.apply_to(components.join(" + "))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Base grid"),
        s.value.apply_to(format!(
            "{0}x{0} @ {1}\"",
            job.grid.shape,
            job.grid.pixel_scales.max()
        ))
    );

    if job.solver.use_upscaling {
        println!(
            "  {:<18}{}",
            s.label.apply_to("Upscaling"),
            s.value.apply_to(format!(
                "x{} to {}\"",
                job.solver.upscale_factor, job.solver.pixel_scale_precision
            ))
        );
    } else {
        println!(
            "  {:<18}{}",
            s.label.apply_to("Upscaling"),
            s.disabled.apply_to("disabled")
        );
    }
    println!(
        "  {:<18}{}",
        s.label.apply_to("Centre exclusion"),
        s.value
            .apply_to(format_optional(job.solver.distance_from_mass_profile_centre))
    );
    println!();
}

pub fn print_find_results(results: &[(Coordinate, CoordinateList)]) {
    let s = Styles::new();

    for (source, positions) in results {
        println!(
            "  {} {}",
            s.header.apply_to("Source"),
            s.value.apply_to(format_coordinate(source))
        );
        if positions.is_empty() {
            println!("    {}", s.disabled.apply_to("no images"));
        }
        for (i, position) in positions.iter().enumerate() {
            println!(
                "    {:<8}{}",
                s.label.apply_to(format!("#{}", i + 1)),
                s.value.apply_to(format_coordinate(&position))
            );
        }
        println!();
    }
}

pub fn print_pair_results(source: &Coordinate, pairs: &[(Coordinate, Option<Coordinate>)]) {
    let s = Styles::new();

    println!(
        "  {} {}",
        s.header.apply_to("Source"),
        s.value.apply_to(format_coordinate(source))
    );
    for (observed, paired) in pairs {
        match paired {
            Some(p) => println!(
                "    {} -> {}  {}",
                s.label.apply_to(format_coordinate(observed)),
                s.value.apply_to(format_coordinate(p)),
                s.label
                    .apply_to(format!("moved {:.6}\"", observed.distance_to(p)))
            ),
            None => println!(
                "    {} -> {}",
                s.label.apply_to(format_coordinate(observed)),
                s.failed.apply_to("not paired")
            ),
        }
    }
    println!();
}
