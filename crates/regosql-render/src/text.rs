use regosql_types::CompileReport;

/// Terminal output: the predicate alone on the first line, so it can be piped into a
/// query builder. Errors render as `error[code]: message`.
pub fn render_text(report: &CompileReport) -> String {
    let mut out = String::new();

    if let Some(err) = &report.error {
        out.push_str(&format!("error[{}]: {}\n", err.code, err.message));
    } else if let Some(sql) = &report.where_clause {
        out.push_str(sql);
        out.push('\n');
    }

    if let Some(d) = &report.decision {
        let verdict = if d.allowed { "allow" } else { "deny" };
        out.push_str(&format!("decision {}: {}\n", d.query, verdict));
    }

    out
}
