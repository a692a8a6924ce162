use regosql_types::{CompileReport, Outcome};

pub fn render_markdown(report: &CompileReport) -> String {
    let mut out = String::new();

    out.push_str("# regosql report\n\n");
    let outcome = match report.outcome {
        Outcome::Where => "WHERE",
        Outcome::Always => "ALWAYS",
        Outcome::Never => "NEVER",
        Outcome::Error => "ERROR",
    };
    out.push_str(&format!(
        "- Unknown: `{}`\n- Outcome: **{}**\n",
        report.unknown, outcome
    ));
    if let Some(fp) = &report.fingerprint {
        out.push_str(&format!("- Fingerprint: `{}`\n", fp));
    }
    if let Some(d) = &report.decision {
        let verdict = if d.allowed { "allowed" } else { "denied" };
        out.push_str(&format!("- Decision: `{}` is **{}**\n", d.query, verdict));
    }
    out.push('\n');

    if let Some(err) = &report.error {
        out.push_str(&format!("> Error `{}`: {}\n", err.code, err.message));
        return out;
    }

    if let Some(sql) = &report.where_clause {
        out.push_str("## Predicate\n\n```sql\n");
        out.push_str(sql);
        out.push_str("\n```\n");
    }

    if report.conjunctions.is_empty() {
        return out;
    }

    out.push_str("\n## Conjunctions\n\n");
    out.push_str("| # | SQL | Bindings |\n|---|-----|----------|\n");
    for (i, c) in report.conjunctions.iter().enumerate() {
        let bindings = c
            .bindings
            .iter()
            .map(|(col, v)| format!("`{}` = `{}`", escape_cell(col), escape_cell(v)))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "| {} | `{}` | {} |\n",
            i + 1,
            escape_cell(&c.sql),
            bindings
        ));
    }

    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
