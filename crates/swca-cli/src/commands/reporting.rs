use colored::Colorize;
use swca_assembler::{AssemblyReport, AssemblyStatus};
use swca_gather::{CopyItem, CopyStatus, PlanWarning};

/// Prints one copy outcome.
pub(crate) fn print_copy_progress(item: &CopyItem, status: &CopyStatus) {
    println!("  {} - {}", item.slot.bold(), item.kind.as_str());
    println!("     {}", item.source.display().to_string().dimmed());
    println!("     {}", item.destination.display().to_string().dimmed());
    match status {
        CopyStatus::Copied => println!("     {}", status.label().green()),
        CopyStatus::Preserved => println!("     {}", status.label().cyan()),
        CopyStatus::Failed(reason) => {
            println!("     {}: {}", status.label().red().bold(), reason)
        }
    }
}

pub(crate) fn print_plan_warning(warning: &PlanWarning) {
    println!(
        "  {} {} - [{}] {}: {}",
        "!!".yellow(),
        warning.slot,
        warning.code,
        warning.path.display(),
        warning.message
    );
}

pub(crate) fn print_assembly_report(report: &AssemblyReport) {
    println!();
    if let Some(gathering) = &report.gathering {
        println!("{}", "Gathering:".bold());
        println!(
            "  {} planned, {} copied, {} preserved, {} failed",
            gathering.planned, gathering.copied, gathering.preserved, gathering.failed
        );
        for item in &report.failed_items {
            println!("  {} {}", "!!".red(), item);
        }
        println!();
    }

    if !report.imported_objects.is_empty() {
        println!("{}", "Scene:".bold());
        println!("  {} {} objects imported", "ok".green(), report.imported_objects.len());
        if let Some(skeleton) = &report.skeleton {
            println!("  {} skeleton {}", "ok".green(), skeleton);
        }
        if let Some(reconciliation) = &report.reconciliation {
            println!(
                "  {} {} body parts, {} gear, {} bound, {} removed",
                "ok".green(),
                reconciliation.partition.body_parts.len(),
                reconciliation.partition.armor_gear.len(),
                reconciliation.bound.len(),
                reconciliation.removed.len()
            );
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("{}", "Warnings:".yellow().bold());
        for warning in &report.warnings {
            println!("  {} {}", "!".yellow(), warning);
        }
        println!();
    }

    let label = match report.status {
        AssemblyStatus::Success => "SUCCESS".green().bold(),
        AssemblyStatus::SuccessWithWarnings => "WARNING".yellow().bold(),
        AssemblyStatus::Cancelled => "CANCELLED".red().bold(),
    };
    println!("{} {}: {}", label, report.character.bold(), report.summary);
}
