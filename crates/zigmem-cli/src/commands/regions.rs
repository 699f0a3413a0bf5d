use zigmem_analysis::classifier::ContextClassifier;
use zigmem_output::OutputFormatter;
use zigmem_rules::types::RegionReport;

/// Run `zigmem regions <file>` — dump the lexical context regions of one
/// file.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool, file: &str) -> i32 {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("zigmem regions: failed to read {}: {}", file, e);
            return 2;
        }
    };

    let classifier = ContextClassifier::analyze_source(&source);
    if verbose {
        eprintln!(
            "zigmem regions: {} — {} region(s)",
            file,
            classifier.regions().len(),
        );
    }

    let result = RegionReport {
        version: "0.2.0".to_string(),
        command: "regions".to_string(),
        file: file.to_string(),
        regions: classifier.regions().to_vec(),
    };
    println!("{}", formatter.format_regions(&result));
    0
}
