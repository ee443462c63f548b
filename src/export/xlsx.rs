//! Spreadsheet export: a flattened, Russian-localized data sheet plus a
//! reference sheet describing every field and the scoring formula.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::error::PipelineError;
use crate::model::{ContactMap, ContactRecord, ContactStatus, DiscoveryMethod};

/// Column width ceiling, matching the reference layout.
const MAX_COLUMN_WIDTH: f64 = 50.0;

/// Sample comments shown in the flat view: first 3, 50 chars each.
const FLAT_SAMPLE_COUNT: usize = 3;
const FLAT_SAMPLE_CHARS: usize = 50;

/// Localized header labels, in column order.
const HEADERS: &[&str] = &[
    "Имя пользователя",
    "Ссылка на профиль",
    "Дата подписки",
    "Является подписчиком",
    "Статус",
    "Оценка вовлеченности",
    "Способ обнаружения",
    "Есть взаимодействия",
    "Всего взаимодействий",
    "Всего комментариев",
    "Дата первого комментария",
    "Дата последнего комментария",
    "Примеры комментариев",
    "Отправлял сообщения",
    "Количество сообщений",
    "Количество запросов на сообщение",
    "Дата первого сообщения",
    "Дата последнего сообщения",
    "Инициировал разговор",
    "Лайки историй",
    "Эмодзи реакции на истории",
    "Взаимодействия с таймерами",
    "Дата последнего взаимодействия с историей",
];

/// One cell of the flattened view.
enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn display_width(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => format!("{n}").len(),
            Cell::Bool(b) => if *b { 4 } else { 5 },
        }
    }
}

fn status_label(status: Option<ContactStatus>) -> String {
    match status {
        Some(ContactStatus::ActiveFollower) => "active_follower",
        Some(ContactStatus::PendingRequest) => "pending_request",
        Some(ContactStatus::RecentRequest) => "recent_request",
        Some(ContactStatus::RecentlyUnfollowed) => "recently_unfollowed",
        Some(ContactStatus::MessageRequestOnly) => "message_request_only",
        None => "",
    }
    .to_string()
}

fn discovery_label(method: Option<DiscoveryMethod>) -> String {
    match method {
        Some(DiscoveryMethod::ContentDiscovery) => "content_discovery",
        Some(DiscoveryMethod::DirectOutreach) => "direct_outreach",
        Some(DiscoveryMethod::Unknown) => "unknown",
        None => "",
    }
    .to_string()
}

/// Flattens a record into the fixed column set.
fn flatten(record: &ContactRecord) -> Vec<Cell> {
    let comments = record.comments.as_ref();
    let messages = record.messages.as_ref();
    let stories = record.story_interactions.as_ref();

    let sample_text = comments
        .map(|c| {
            c.sample_comments
                .iter()
                .take(FLAT_SAMPLE_COUNT)
                .map(|s| crate::text::truncate_chars(&s.text, FLAT_SAMPLE_CHARS))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .unwrap_or_default();

    vec![
        Cell::Text(record.username.clone()),
        Cell::Text(record.profile_url.clone()),
        Cell::Text(record.follow_date_iso.clone().unwrap_or_default()),
        Cell::Bool(record.is_follower),
        Cell::Text(status_label(record.status)),
        Cell::Number(record.engagement_score.unwrap_or(0.0)),
        Cell::Text(discovery_label(record.inferred_discovery_method)),
        Cell::Bool(record.has_interactions.unwrap_or(false)),
        Cell::Number(record.total_interactions.unwrap_or(0) as f64),
        Cell::Number(comments.map_or(0, |c| c.total_comments) as f64),
        Cell::Text(comments.and_then(|c| c.first_comment_date.clone()).unwrap_or_default()),
        Cell::Text(comments.and_then(|c| c.last_comment_date.clone()).unwrap_or_default()),
        Cell::Text(sample_text),
        Cell::Bool(messages.is_some_and(|m| m.has_messaged)),
        Cell::Number(messages.map_or(0, |m| m.message_count) as f64),
        Cell::Number(messages.and_then(|m| m.message_request_count).unwrap_or(0) as f64),
        Cell::Text(messages.and_then(|m| m.first_message_date.clone()).unwrap_or_default()),
        Cell::Text(messages.and_then(|m| m.last_message_date.clone()).unwrap_or_default()),
        Cell::Bool(messages.is_some_and(|m| m.initiated_conversation)),
        Cell::Number(stories.map_or(0, |s| s.story_likes_count) as f64),
        Cell::Number(stories.map_or(0, |s| s.emoji_reactions_count) as f64),
        Cell::Number(stories.map_or(0, |s| s.countdown_interactions_count) as f64),
        Cell::Text(
            stories
                .and_then(|s| s.last_story_interaction_date.clone())
                .unwrap_or_default(),
        ),
    ]
}

/// Reference rows for the second sheet: field descriptions, the scoring
/// formula, and the status/discovery legends.
fn reference_rows() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Имя пользователя", "Имя пользователя в Instagram (без @)"),
        ("Ссылка на профиль", "Полная ссылка на профиль пользователя"),
        ("Дата подписки", "Дата и время, когда пользователь подписался на ваш аккаунт"),
        ("Является подписчиком", "Да/Нет - является ли пользователь подписчиком (Нет для запросов на сообщение)"),
        ("Статус", "Статус пользователя: активный подписчик, ожидающий запрос, недавно отписался, только запрос на сообщение"),
        ("Оценка вовлеченности", "Рассчитанная оценка вовлеченности пользователя (см. формулу ниже)"),
        ("Способ обнаружения", "Как пользователь мог найти ваш аккаунт: через контент, прямой контакт, неизвестно"),
        ("Есть взаимодействия", "Да/Нет - есть ли у пользователя какие-либо взаимодействия"),
        ("Всего взаимодействий", "Общее количество всех взаимодействий (комментарии + сообщения + истории)"),
        ("Всего комментариев", "Общее количество комментариев, оставленных пользователем"),
        ("Дата первого комментария", "Дата и время первого комментария от пользователя"),
        ("Дата последнего комментария", "Дата и время последнего комментария от пользователя"),
        ("Примеры комментариев", "Примеры комментариев пользователя (первые 3)"),
        ("Отправлял сообщения", "Да/Нет - отправлял ли пользователь сообщения"),
        ("Количество сообщений", "Общее количество сообщений в переписке"),
        ("Количество запросов на сообщение", "Количество сообщений в запросах (для не подписчиков)"),
        ("Дата первого сообщения", "Дата и время первого сообщения от пользователя"),
        ("Дата последнего сообщения", "Дата и время последнего сообщения от пользователя"),
        ("Инициировал разговор", "Да/Нет - начал ли пользователь разговор первым"),
        ("Лайки историй", "Количество лайков, поставленных на ваши истории"),
        ("Эмодзи реакции на истории", "Количество эмодзи реакций на ваши истории"),
        ("Взаимодействия с таймерами", "Количество взаимодействий с таймерами обратного отсчета в историях"),
        ("Дата последнего взаимодействия с историей", "Дата последнего взаимодействия с любой историей"),
        ("", ""),
        ("ФОРМУЛА ОЦЕНКИ ВОВЛЕЧЕННОСТИ", ""),
        ("Компонент", "Баллы"),
        ("Комментарий", "2 балла за каждый комментарий"),
        ("Сообщение", "3 балла за каждое сообщение"),
        ("Бонус за инициацию разговора", "5 дополнительных баллов, если пользователь начал разговор"),
        ("Лайк истории", "1 балл за каждый лайк истории"),
        ("Эмодзи реакция на историю", "1 балл за каждую эмодзи реакцию"),
        ("Взаимодействие с таймером", "1 балл за каждое взаимодействие с таймером"),
        ("Бонус за актуальность (взаимодействие <30 дней)", "10 дополнительных баллов"),
        ("Бонус за актуальность (взаимодействие <90 дней)", "5 дополнительных баллов"),
        ("", ""),
        ("СТАТУСЫ ПОЛЬЗОВАТЕЛЕЙ", ""),
        ("Статус", "Описание"),
        ("active_follower", "Активный подписчик"),
        ("pending_request", "Ожидающий запрос на подписку"),
        ("recent_request", "Недавний запрос на подписку"),
        ("recently_unfollowed", "Недавно отписался"),
        ("message_request_only", "Только запрос на сообщение (не подписчик)"),
        ("", ""),
        ("СПОСОБЫ ОБНАРУЖЕНИЯ", ""),
        ("Способ", "Описание"),
        ("content_discovery", "Нашел через контент (прокомментировал до подписки)"),
        ("direct_outreach", "Прямой контакт (написал сообщение до подписки или инициировал разговор)"),
        ("unknown", "Неизвестно (нет четкого паттерна)"),
    ]
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    match cell {
        Cell::Text(s) => sheet.write(row, col, s.as_str())?,
        Cell::Number(n) => sheet.write(row, col, *n)?,
        Cell::Bool(b) => sheet.write(row, col, *b)?,
    };
    Ok(())
}

fn apply_widths(
    sheet: &mut Worksheet,
    widths: &[usize],
) -> Result<(), rust_xlsxwriter::XlsxError> {
    for (col, &width) in widths.iter().enumerate() {
        let adjusted = ((width + 2) as f64).min(MAX_COLUMN_WIDTH);
        sheet.set_column_width(col as u16, adjusted)?;
    }
    Ok(())
}

/// Writes the two-sheet workbook. Records keep map insertion order; the
/// JSONL file carries the ranking.
///
/// Returns `true` so the feature-disabled stub can report a skip instead.
pub fn export_xlsx(contacts: &ContactMap, path: &Path) -> Result<bool, PipelineError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet().set_name("Данные")?;
    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *header, &bold)?;
    }
    for (row, record) in contacts.values().enumerate() {
        for (col, cell) in flatten(record).iter().enumerate() {
            write_cell(sheet, row as u32 + 1, col as u16, cell)?;
            widths[col] = widths[col].max(cell.display_width());
        }
    }
    apply_widths(sheet, &widths)?;

    let reference = workbook.add_worksheet().set_name("Описание полей")?;
    reference.write_with_format(0, 0, "Поле", &bold)?;
    reference.write_with_format(0, 1, "Описание", &bold)?;
    let mut ref_widths = [4usize, 8usize];
    for (row, (field, description)) in reference_rows().iter().enumerate() {
        reference.write(row as u32 + 1, 0, *field)?;
        reference.write(row as u32 + 1, 1, *description)?;
        ref_widths[0] = ref_widths[0].max(field.chars().count());
        ref_widths[1] = ref_widths[1].max(description.chars().count());
    }
    apply_widths(reference, &ref_widths)?;

    workbook.save(path)?;
    info!(count = contacts.len(), path = %path.display(), "wrote spreadsheet export");
    Ok(true)
}
