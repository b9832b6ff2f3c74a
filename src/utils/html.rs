/// Sanitises free text before it is stored (notification messages, names).
///
/// Whitelist-based: harmless inline tags survive, `<script>` and friends are
/// removed together with their content, event-handler attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::clean_html;

    #[test]
    fn strips_scripts_and_keeps_text() {
        assert_eq!(
            clean_html("Results <script>alert(1)</script>published"),
            "Results published"
        );
        assert_eq!(clean_html("  <b>Grade 7</b> "), "<b>Grade 7</b>");
    }
}
