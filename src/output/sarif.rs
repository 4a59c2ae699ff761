use crate::rules::find_rule;
use crate::violation::{LintReport, Severity, Violation};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::{BTreeSet, HashMap};

pub fn format(reports: &[LintReport]) -> String {
    let all_violations: Vec<&Violation> = reports
        .iter()
        .flat_map(|r| r.violations.iter().chain(r.suppressed.iter()))
        .collect();

    let rule_names: Vec<&str> = all_violations
        .iter()
        .map(|v| v.rule.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let rule_index: HashMap<&str, i64> = rule_names
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i as i64))
        .collect();

    let rules: Vec<ReportingDescriptor> = rule_names
        .iter()
        .map(|name| {
            let mut descriptor = ReportingDescriptor::builder().id(name.to_string()).build();
            let description = match find_rule(name) {
                Some(rule) => {
                    descriptor.help_uri = rule.meta().url.map(str::to_string);
                    rule.description().to_string()
                }
                None => "The file could not be parsed".to_string(),
            };
            descriptor.short_description = Some(
                MultiformatMessageString::builder()
                    .text(description)
                    .build(),
            );
            descriptor
        })
        .collect();

    let results: Vec<SarifResult> = all_violations
        .iter()
        .map(|v| {
            let level = match v.severity {
                Severity::Error => ResultLevel::Error,
                Severity::Warning => ResultLevel::Warning,
            };

            let mut result = SarifResult::builder()
                .message(Message::builder().text(v.message.clone()).build())
                .build();

            result.rule_id = Some(v.rule.clone());
            result.level = Some(level);
            result.rule_index = rule_index.get(v.rule.as_str()).copied();

            if let Some(ref file) = v.file {
                let uri = file.to_string_lossy().replace('\\', "/");

                let mut location = Location::builder().build();
                let mut physical = PhysicalLocation::builder().build();

                physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());
                physical.region = Some(
                    Region::builder()
                        .start_line(v.line as i64)
                        .start_column(v.column as i64)
                        .build(),
                );

                location.physical_location = Some(physical);
                result.locations = Some(vec![location]);
            }

            result
        })
        .collect();

    let driver = ToolComponent::builder()
        .name("lessguard")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();

    let tool = Tool::builder().driver(driver).build();

    let run = Run::builder().tool(tool).results(results).build();

    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif).expect("SARIF serialization failed")
}
