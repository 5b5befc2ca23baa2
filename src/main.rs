use clap::Parser;
use std::io::Write;
use water_bill::config::Command;
use water_bill::utils::error::{ErrorSeverity, Result};
use water_bill::utils::format::{format_peso, format_percent, format_quantity};
use water_bill::utils::{logger, validation::Validate};
use water_bill::{
    BatchRunner, BillResult, BillingEngine, ChargeMode, CliConfig, CustomerClass, RateSchedule,
};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&config) {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(config: &CliConfig) -> Result<()> {
    let registry = config.load_registry()?;
    let engine = BillingEngine::new(&*registry);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &config.command {
        Command::Calculate {
            consumption,
            customer_class,
            json,
        } => {
            let bill = engine.compute_bill(consumption.as_str(), *customer_class)?;
            if *json {
                serde_json::to_writer_pretty(&mut out, &bill)?;
                writeln!(out)?;
            } else {
                print_bill(&mut out, &bill)?;
            }
        }
        Command::Rates { customer_class } => {
            let classes = match customer_class {
                Some(class) => vec![*class],
                None => CustomerClass::ALL.to_vec(),
            };
            for class in classes {
                print_schedule(&mut out, engine.schedules().get_schedule(class))?;
            }
        }
        Command::Batch { input } => {
            let file = std::fs::File::open(input)?;
            let runner = BatchRunner::new(engine, chrono::Utc::now());
            let summary = runner.run(file, &mut out)?;
            eprintln!(
                "✅ Billed {} of {} readings ({} rejected), total {}",
                summary.billed,
                summary.processed,
                summary.rejected,
                format_peso(summary.total_billed)
            );
        }
    }

    out.flush()?;
    Ok(())
}

fn print_bill(out: &mut impl Write, bill: &BillResult) -> Result<()> {
    writeln!(
        out,
        "Water bill: {} cu.m ({})",
        format_quantity(bill.consumption()),
        bill.customer_class()
    )?;
    for item in bill.line_items() {
        writeln!(
            out,
            "  {:<24} {:>14}  {}",
            item.label,
            format_peso(item.amount),
            item.description
        )?;
    }
    writeln!(out, "  {:<24} {:>14}", "Total Amount Due", format_peso(bill.total_due()))?;
    writeln!(
        out,
        "Computed at {}, due {}",
        bill.computed_at().to_rfc3339(),
        bill.due_date()
    )?;
    Ok(())
}

fn print_schedule(out: &mut impl Write, schedule: &RateSchedule) -> Result<()> {
    writeln!(out, "Rate information ({})", schedule.customer_class)?;
    for tier in &schedule.tiers {
        let mode = match tier.charge_mode {
            ChargeMode::Fixed => "fixed",
            ChargeMode::PerUnit => "per cu.m",
        };
        writeln!(
            out,
            "  {:>8} cu.m  {:>12} {}",
            tier.range_text(),
            format_peso(tier.rate),
            mode
        )?;
    }
    writeln!(out, "  Base fee: {}", format_peso(schedule.base_fee))?;
    writeln!(
        out,
        "  {}: {} of subtotal",
        schedule.surcharge_label,
        format_percent(schedule.surcharge_rate)
    )?;
    Ok(())
}
