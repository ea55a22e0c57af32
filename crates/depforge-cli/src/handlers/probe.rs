//! `depforge probe`: host information and recorded builds.

use depforge_core::{BuildRecord, EnvironmentProbe, PipelineResult};

use crate::bootstrap::CliContext;

pub fn execute(ctx: &CliContext) -> PipelineResult<()> {
    let probe = &ctx.probe;
    let os = probe.os_family();

    println!("OS:        {os}");
    println!("CPUs:      {}", probe.logical_cpu_count());
    println!(
        "Jobs:      {}",
        ctx.config.parallelism(probe.logical_cpu_count())
    );
    println!("Generator: {}", probe.build_generator()?);
    println!("Root:      {}", ctx.config.root.display());

    let records = BuildRecord::list(&ctx.config.layout().records_dir())?;
    println!();
    if records.is_empty() {
        println!("No dependencies built yet.");
        return Ok(());
    }

    println!("Built dependencies:");
    for record in records {
        println!(
            "  ✓ {} {} ({}, {}) built {}",
            record.dependency,
            record.version,
            record.build_mode,
            record.generator,
            record.build_date.format("%Y-%m-%d %H:%M UTC")
        );
    }
    Ok(())
}
