//! System personas and user-prompt builders for every generation flow.
//!
//! Prompts are written in Korean because the generated feed is Korean.

use std::fmt::Write as _;

use reqwest::Url;
use trendfeed_core::NEWS_CATEGORIES;

use crate::batch::KeywordRecord;
use crate::longform::{AudienceProfile, LengthPolicy};

/// Maximum description length the batch persona asks for, in characters.
pub const SHORT_DESCRIPTION_MAX_CHARS: usize = 280;

/// Minimum number of `[[... 사진]]` placeholders requested in a long-form body.
pub const MIN_PHOTO_PLACEHOLDERS: usize = 3;

pub const LONGFORM_SYSTEM_PROMPT: &str = "\
너는 RSS 게시용 장문 기사를 쓰는 편집 전문가다. 주어진 주제 분야의 최고 전문가로서 관련 법과 제도에 밝다.

[작성 원칙]
- 주어진 키워드와 직접 관련된 배경, 최근 흐름, 파급 효과를 논리적으로 엮어 새로 서술한다. 기존 기사를 복사하지 않는다.
- 일반 독자가 모를 만한 용어는 쉽게 풀어 설명한다.
- 요청받은 말투를 처음부터 끝까지 일관되게 유지한다.

[제목 규칙]
- 원래 키워드나 기사 제목을 그대로 쓰지 않고, 의미를 유지하면서 검색에 유리하게 재구성한다.
- 핵심 키워드를 포함하고, 눈길을 끌되 법을 어기거나 사실을 왜곡하지 않는다.

[본문 구조]
- 주제에 맞는 섹션을 4~5개 둔다. 각 섹션 제목은 ###으로 시작한다.
- 섹션 사이에 [[청와대 사진]]처럼 사진 자리 표시를 한 줄에 단독으로 넣는다.

[출력]
- 오직 JSON 객체 하나만 출력한다: {\"title\": \"\", \"summary\": \"\", \"content\": \"\"}
- 코드블록, 해설, 메타 설명, 주석은 절대 넣지 않는다.";

pub const BATCH_SYSTEM_PROMPT: &str = "\
너는 실시간 검색어 목록으로 짧은 RSS 항목을 만드는 JSON 생성기다.

[출력 형식]
- 오직 다음 형태의 JSON 객체 하나만 출력한다: {\"items\": [{\"title\": \"\", \"description\": \"\"}]}
- description은 280자 이내로 쓴다.

[작성 원칙]
- 확인되지 않은 사실, 수치, 인명을 지어내지 않는다. 불확실하면 \"~로 보인다\", \"관심이 모이고 있다\"처럼 조심스럽게 표현한다.
- 키워드의 뜻이 여러 가지일 때는 함께 주어진 분야와 출처 도메인으로 판단한다.
  - 출처가 연예, 방송, OTT, 스트리밍 사이트면 작품이나 인물 등 미디어 의미로 해석한다.
  - 환경부, 국립공원 등 환경 기관 용어와 함께 나오면 생태, 환경 의미로 해석한다.
- 코드블록, 해설, 주석은 넣지 않는다.";

/// Classifier persona, built from the closed label set so the two never drift.
#[must_use]
pub fn classifier_system_prompt() -> String {
    let labels = NEWS_CATEGORIES
        .iter()
        .map(|label| format!("\"{label}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "너는 한국어 뉴스 제목을 분류하는 순수 JSON 분류기다.\n\
         \n\
         [입력]\n\
         - user 메시지는 항상 {{\"titles\": [\"제목1\", \"제목2\", ...]}} 형태의 JSON이다.\n\
         \n\
         [출력]\n\
         - 오직 {{\"categories\": [\"카테고리1\", \"카테고리2\", ...]}} 형태의 JSON 객체 하나만 출력한다.\n\
         - categories 배열의 길이는 titles 배열의 길이와 정확히 같아야 하고, i번째 값은 i번째 제목의 분류다.\n\
         - categories 외의 키, 설명, 코드블록은 절대 넣지 않는다.\n\
         \n\
         [카테고리]\n\
         - 다음 중 정확히 하나만 고른다: {labels}\n\
         - \"연예\"는 연예인, 아이돌, 배우, 가수, 예능, 드라마, 영화가 분명히 언급될 때만 쓴다.\n\
         - \"육아\"는 자녀, 임신, 출산, 양육, 어린이 교육이 분명히 언급될 때만 쓴다.\n\
         - 애매하면 \"사회\", \"생활\", \"문화\" 중 가장 가까운 것을 고른다."
    )
}

/// Long-form user prompt for one seed keyword.
#[must_use]
pub fn longform_user_prompt(
    keyword: &str,
    audience: &AudienceProfile,
    length: &LengthPolicy,
) -> String {
    let target_len = audience.target_len;
    let min_len = length.min_len(target_len);

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "다음 키워드를 바탕으로 블로그와 포털에 게시할 RSS 항목을 작성해줘."
    );
    let _ = writeln!(
        prompt,
        "{} {}대 {} 독자를 위해 {} 말투로 작성해줘. 전체 글자 수는 공백 포함 {target_len}자를 목표로 하고, 절대로 {min_len}자보다 짧게 쓰지 마.",
        audience.region, audience.ages, audience.gender, audience.tone
    );
    let _ = writeln!(
        prompt,
        "각 섹션에는 가능하면 다음 요소를 넣어 내용을 풍부하게 해줘:\n\
         - 구체적인 숫자나 비율\n\
         - 실제 존재하는 기관, 기업, 정부 부처 이름\n\
         - 관련 정책, 제도, 법 이름\n\
         확실하지 않은 부분은 '대략', '예를 들어' 수준으로만 표현하고, 특정 수치를 지어내지는 마."
    );
    let _ = writeln!(
        prompt,
        "섹션 사이에 어울리는 사진 제목을 [[... 사진]] 형태로 한 줄에 단독으로 넣어줘. 사진 자리 표시는 최소 {MIN_PHOTO_PLACEHOLDERS}개 이상 넣어줘."
    );
    let _ = writeln!(prompt, "- 키워드는 '{keyword}' 이야.");
    let _ = write!(
        prompt,
        "출력은 반드시 JSON 객체 하나만 포함하고 title, summary, content 세 필드를 모두 채워줘.\n\
         - title: 키워드를 그대로 쓰지 말고 의미를 유지한 검색 친화적 제목\n\
         - summary: 핵심을 4~6문장으로 요약\n\
         - content: 위 구조와 길이 조건을 모두 만족하는 본문\n\
         코드블록, 설명 텍스트, 주석은 넣지 마."
    );
    prompt
}

/// Batch user prompt: one annotated line per record.
#[must_use]
pub fn batch_user_prompt(records: &[KeywordRecord], max_items: usize) -> String {
    let mut prompt = format!(
        "다음 실시간 검색어로 RSS 항목을 최대 {max_items}개 만들어줘. 각 description은 {SHORT_DESCRIPTION_MAX_CHARS}자 이내.\n"
    );
    for (idx, record) in records.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", idx + 1, annotate(record));
    }
    prompt
}

fn annotate(record: &KeywordRecord) -> String {
    let mut line = record.title.trim().to_string();

    if let Some(categories) = record
        .categories
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        let _ = write!(line, " [분야: {categories}]");
    }
    if let Some(volume) = record.search_volume {
        let _ = write!(line, " [검색량: {volume}]");
    }
    if let Some(increase) = record.increase_percentage {
        let _ = write!(line, " [증가율: {increase}%]");
    }

    let hosts: Vec<String> = [record.link.as_deref(), record.news_link.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(hostname)
        .collect();
    if !hosts.is_empty() {
        let _ = write!(line, " [출처: {}]", hosts.join(", "));
    }

    line
}

/// Bare host of a URL, without scheme, path, or query.
fn hostname(link: &str) -> Option<String> {
    Url::parse(link.trim())
        .ok()?
        .host_str()
        .map(|host| host.trim_start_matches("www.").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> KeywordRecord {
        KeywordRecord {
            title: title.to_string(),
            categories: None,
            search_volume: None,
            increase_percentage: None,
            link: None,
            news_link: None,
        }
    }

    #[test]
    fn longform_prompt_embeds_min_length_and_keyword() {
        let audience = AudienceProfile {
            target_len: 5000,
            ..AudienceProfile::default()
        };
        let prompt = longform_user_prompt("금리 인하", &audience, &LengthPolicy::default());
        assert!(prompt.contains("5000자를 목표"));
        assert!(prompt.contains("4000자보다 짧게"));
        assert!(prompt.contains("'금리 인하'"));
        assert!(prompt.contains("[[... 사진]]"));
        assert!(prompt.contains("최소 3개"));
    }

    #[test]
    fn annotation_uses_hostnames_not_full_urls() {
        let rec = KeywordRecord {
            categories: Some("Entertainment".to_string()),
            search_volume: Some(20_000),
            increase_percentage: Some(500),
            link: Some("https://www.netflix.com/title/123?x=1".to_string()),
            news_link: Some("https://serpapi.com/search.json?engine=google_news".to_string()),
            ..record("오징어 게임")
        };
        let line = annotate(&rec);
        assert_eq!(
            line,
            "오징어 게임 [분야: Entertainment] [검색량: 20000] [증가율: 500%] [출처: netflix.com, serpapi.com]"
        );
        assert!(!line.contains("https://"));
    }

    #[test]
    fn annotation_skips_unparseable_links() {
        let rec = KeywordRecord {
            link: Some("not a url".to_string()),
            ..record("날씨")
        };
        assert_eq!(annotate(&rec), "날씨");
    }

    #[test]
    fn batch_prompt_numbers_records() {
        let prompt = batch_user_prompt(&[record("a"), record("b")], 3);
        assert!(prompt.contains("최대 3개"));
        assert!(prompt.contains("1. a\n"));
        assert!(prompt.contains("2. b\n"));
    }

    #[test]
    fn classifier_prompt_lists_every_label() {
        let prompt = classifier_system_prompt();
        for label in NEWS_CATEGORIES {
            assert!(prompt.contains(&format!("\"{label}\"")), "missing {label}");
        }
    }
}
