const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Pull the payload out of a Markdown code fence.
///
/// A fence tagged `json` wins over any earlier untagged one. Without any fence
/// the input comes back unchanged.
pub fn strip_fences(raw: &str) -> String {
    if let Some(start) = find_json_fence(raw) {
        return fenced_payload(raw, start + FENCE.len() + JSON_TAG.len());
    }

    match raw.find(FENCE) {
        Some(start) => {
            let after = start + FENCE.len();
            fenced_payload(raw, after + language_tag_len(&raw[after..]))
        }
        None => raw.to_string(),
    }
}

// to_ascii_lowercase 不改變 byte 位置
fn find_json_fence(raw: &str) -> Option<usize> {
    let lowered = raw.to_ascii_lowercase();
    let mut offset = 0;
    while let Some(pos) = lowered[offset..].find(FENCE) {
        let start = offset + pos;
        let tag_start = start + FENCE.len();
        let rest = &lowered[tag_start..];
        if rest.starts_with(JSON_TAG) && !continues_identifier(&rest[JSON_TAG.len()..]) {
            return Some(start);
        }
        offset = tag_start;
    }
    None
}

fn continues_identifier(rest: &str) -> bool {
    rest.chars()
        .next()
        .map(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        .unwrap_or(false)
}

/// Length of a language tag such as `javascript` directly after an opening fence.
fn language_tag_len(after_fence: &str) -> usize {
    let first_line = after_fence.split('\n').next().unwrap_or("");
    let tag = first_line.trim_end();
    let is_tag = !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'));
    if is_tag {
        tag.len()
    } else {
        0
    }
}

fn fenced_payload(raw: &str, content_start: usize) -> String {
    let rest = &raw[content_start..];
    let body = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        // 沒有結尾 fence 時取剩下全部
        None => rest,
    };
    body.trim().to_string()
}
