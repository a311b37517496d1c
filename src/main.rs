use anyhow::Result;
use std::env;
use std::path::Path;

use log::info;
use migrato::conversion::pipeline::{Converter, SourceData};
use migrato::data;

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() != 6 {
        eprintln!("Usage: cargo run -- <transactions.csv> <transfers.csv> <chart.csv> <mapping.csv> <output_dir>");
        std::process::exit(1);
    }

    let source = SourceData {
        transactions: data::read_table(&args[1])?,
        transfers: data::read_table(&args[2])?,
        chart: data::read_table(&args[3])?,
    };

    let converter = Converter::default();
    let report = converter.reconcile(&source)?;

    let mut draft = report.draft();
    let mapping_path = Path::new(&args[4]);
    if mapping_path.exists() {
        let loaded = data::load_mapping(mapping_path, &mut draft)?;
        info!("loaded category mapping, entries={}", loaded);
    }

    let mapping = match draft.clone().freeze() {
        Ok(mapping) => mapping,
        Err(err) => {
            data::save_mapping_draft(mapping_path, &report, &draft)?;
            eprintln!("{}", err);
            for label in &err.missing {
                match report.suggestion(label) {
                    Some(suggestion) => eprintln!("  {} (suggestion: {})", label, suggestion),
                    None => eprintln!("  {}", label),
                }
            }
            eprintln!("Fill in categoria_nova in {} and run again.", mapping_path.display());
            std::process::exit(1);
        },
    };

    if !mapping.is_empty() {
        data::save_mapping(mapping_path, &mapping)?;
    }

    let conversion = converter.convert(&source, &mapping)?;
    let output_dir = Path::new(&args[5]);
    data::write_tables(output_dir, &conversion.tables)?;
    data::write_summary(output_dir.join(data::SUMMARY_FILE_NAME), &conversion.summary)?;

    Ok(())
}
