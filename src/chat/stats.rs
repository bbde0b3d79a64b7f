use serde_json::Value;

pub const MISSING_VALUE: &str = "N/A";

#[derive(Clone, Copy, Debug)]
struct StatField {
    name: &'static str,
    path: &'static [&'static str],
    description: &'static str,
}

const fn field(
    name: &'static str,
    path: &'static [&'static str],
    description: &'static str,
) -> StatField {
    StatField {
        name,
        path,
        description,
    }
}

const COUNTS: &str = "Message Counts and Types";
const ACTIVITY: &str = "Activity Metrics";
const TIME: &str = "Time-Related Details";
const WORDS: &str = "Word Usage Statistics";
const EMOJI: &str = "Emoji Usage (in text and reactions)";

const TOTAL_MESSAGES: StatField = field(
    "Total Messages",
    &[COUNTS, "total_messages"],
    "You sent",
);
const AVERAGE_PER_DAY: StatField = field(
    "Average Messages per Day",
    &[ACTIVITY, "average_messages_per_day"],
    "On average, you send",
);
const LONGEST_GAP: StatField = field(
    "Longest Period Without Messages",
    &[ACTIVITY, "longest_period_without_messages"],
    "Longest period without messages",
);
const LONGEST_CONVERSATION: StatField = field(
    "Longest Active Conversation",
    &[ACTIVITY, "longest_active_conversation"],
    "Your longest chat lasted",
);
const MOST_ACTIVE_YEAR: StatField = field(
    "Most Active Year",
    &[TIME, "most_active_year"],
    "Most active year",
);
const UNIQUE_WORDS: StatField = field(
    "Unique Words Used",
    &[WORDS, "unique_words_used"],
    "Unique words used",
);
const AVERAGE_WORDS: StatField = field(
    "Average Words per Message",
    &[WORDS, "average_words_per_message"],
    "Your average message length is",
);
const TOTAL_EMOJI: StatField = field(
    "Total Emoji Used",
    &[EMOJI, "total_emoji_used"],
    "Total emoji used",
);
const MOST_USED_EMOJI: StatField = field(
    "Most Used Emoji",
    &["Most Used Emoji", "emoji"],
    "Most used emoji",
);
const DRYNESS: StatField = field("Dryness Score", &["Dryness Score"], "Dryness score");
const HUMOR: StatField = field("Humor Score", &["Humor Score"], "Humor score");
const ROMANCE: StatField = field("Romance Score", &["Romance Score"], "Romance score");

const SIDEBAR_FIELDS: [StatField; 12] = [
    TOTAL_MESSAGES,
    AVERAGE_PER_DAY,
    LONGEST_GAP,
    LONGEST_CONVERSATION,
    MOST_ACTIVE_YEAR,
    UNIQUE_WORDS,
    AVERAGE_WORDS,
    TOTAL_EMOJI,
    MOST_USED_EMOJI,
    DRYNESS,
    HUMOR,
    ROMANCE,
];

const BASIC_FIELDS: [StatField; 12] = [
    TOTAL_MESSAGES,
    field(
        "Edited Messages",
        &[COUNTS, "edited_messages"],
        "Edited messages",
    ),
    AVERAGE_PER_DAY,
    LONGEST_GAP,
    LONGEST_CONVERSATION,
    MOST_ACTIVE_YEAR,
    field(
        "Most Active Month",
        &[TIME, "most_active_month"],
        "Most active month",
    ),
    field(
        "Most Active Day",
        &[TIME, "most_active_day"],
        "Your most chatty day is",
    ),
    field(
        "Most Active Hour",
        &[TIME, "most_active_hour"],
        "Most active hour",
    ),
    field(
        "Total Meaningful Words",
        &[WORDS, "total_meaningful_words"],
        "You typed",
    ),
    UNIQUE_WORDS,
    AVERAGE_WORDS,
];

const INTERESTING_FIELDS: [StatField; 9] = [
    TOTAL_EMOJI,
    field(
        "Messages with at Least One Emoji",
        &[EMOJI, "messages_with_at_least_one_emoji"],
        "Messages with at least one emoji",
    ),
    field(
        "Total Emoji Used in Reactions",
        &[EMOJI, "total_emoji_used_in_reactions"],
        "Total emoji used in reactions",
    ),
    field(
        "Unique Emoji Used in Reactions",
        &[EMOJI, "unique_emoji_used_in_reactions"],
        "Unique emoji used in reactions",
    ),
    field(
        "Messages with at Least One Emoji Reacted",
        &[EMOJI, "messages_with_at_least_one_emoji_reacted"],
        "Messages with at least one emoji reacted",
    ),
    MOST_USED_EMOJI,
    DRYNESS,
    HUMOR,
    ROMANCE,
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricCard {
    pub name: &'static str,
    pub value: String,
    pub description: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricSet {
    Basic,
    Interesting,
}

impl MetricSet {
    pub fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Interesting => "Interesting",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Basic => Self::Interesting,
            Self::Interesting => Self::Basic,
        }
    }

    fn fields(self) -> &'static [StatField] {
        match self {
            Self::Basic => &BASIC_FIELDS,
            Self::Interesting => &INTERESTING_FIELDS,
        }
    }
}

/// Renders a stats leaf for display. Arrays such as `[year, count]` show
/// their first element.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(format_number(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Array(items) => items.first().and_then(display_value),
        Value::Object(_) => Some(value.to_string()),
    }
}

// Integers print as-is, fractions are cut to two decimals.
fn format_number(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }

    match number.as_f64() {
        Some(value) => {
            let fixed = format!("{value:.2}");
            fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
        }
        None => number.to_string(),
    }
}

pub fn lookup<'a>(stats: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(stats, |value, key| value.get(key))
}

fn cards(stats: &Value, fields: &[StatField]) -> Vec<MetricCard> {
    fields
        .iter()
        .map(|field| MetricCard {
            name: field.name,
            value: lookup(stats, field.path)
                .and_then(display_value)
                .unwrap_or_else(|| MISSING_VALUE.to_owned()),
            description: field.description,
        })
        .collect()
}

/// The fixed twelve stats shown beside a selected point.
pub fn sidebar_metrics(stats: &Value) -> Vec<MetricCard> {
    cards(stats, &SIDEBAR_FIELDS)
}

pub fn metric_cards(stats: &Value, set: MetricSet) -> Vec<MetricCard> {
    cards(stats, set.fields())
}

/// Position within the metric carousel. Navigation wraps in both directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Carousel {
    pub set: MetricSet,
    pub index: usize,
}

impl Default for Carousel {
    fn default() -> Self {
        Self {
            set: MetricSet::Basic,
            index: 0,
        }
    }
}

impl Carousel {
    pub fn card_count(&self) -> usize {
        self.set.fields().len()
    }

    pub fn next(&mut self) {
        let len = self.card_count();
        if len > 0 {
            self.index = (self.index + 1) % len;
        }
    }

    pub fn prev(&mut self) {
        let len = self.card_count();
        if len > 0 {
            self.index = (self.index + len - 1) % len;
        }
    }

    pub fn toggle_set(&mut self) {
        self.set = self.set.toggled();
        self.index = 0;
    }

    pub fn counter_text(&self) -> String {
        format!("{} / {}", self.index + 1, self.card_count())
    }
}
