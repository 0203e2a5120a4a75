/// Collapses whitespace in a query written in readable multi-line form
/// and rewrites `?` placeholders into Postgres `$n` positional params.
pub fn sql(query: &str) -> String {
    let flat = query.split_whitespace().collect::<Vec<&str>>().join(" ");

    let mut result = String::with_capacity(flat.len());
    let mut param_index = 0;
    for ch in flat.chars() {
        if ch == '?' {
            param_index += 1;
            result.push('$');
            result.push_str(&param_index.to_string());
        } else {
            result.push(ch);
        }
    }
    result
}
