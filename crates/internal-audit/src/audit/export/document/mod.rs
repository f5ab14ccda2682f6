//! Paginated PDF report.
//!
//! [`layout`] turns a report into an ordered list of [`Block`]s without
//! touching any font or page geometry; [`render`] resolves the font chain
//! once and paints the blocks onto A4 pages.

mod fonts;
mod render;

pub use fonts::{FontChain, FontSource, FontTier, DEFAULT_NATIVE_FONT, DEFAULT_SYSTEM_FONT};
pub use render::{render, RenderedDocument};

use crate::audit::checklist::SPECIAL_NOTES_HEADING;
use crate::audit::domain::{EvaluationDimension, Grade, ItemResponse};
use crate::audit::report::AuditReport;

pub const DOCUMENT_TITLE: &str = "Imaging CRO 内部監査チェックシート";
pub const ATTRIBUTION: [&str; 3] = [
    "株式会社リジット",
    "コード開発者：代表および信頼性保証責任者",
    "山本修司",
];
pub const EVALUATION_HEADING: &str = "監査結果の評価（顧問記入）";
pub const SUMMARY_HEADER: [&str; 2] = ["評価項目", "評価"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Heading,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBlock {
    pub label: String,
    pub status: String,
    pub comment: String,
}

impl ItemBlock {
    fn from_response(response: &ItemResponse) -> Self {
        Self {
            label: response.label.to_string(),
            status: response.status.label().to_string(),
            comment: response.comment.clone(),
        }
    }

    pub fn lines(&self) -> [String; 3] {
        [
            format!("項目：{}", self.label),
            format!("対応状況：{}", self.status),
            format!("コメント：{}", self.comment),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRow {
    pub dimension: EvaluationDimension,
    pub grade: Grade,
}

/// Two-column evaluation table; one header row plus one row per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    pub header: [&'static str; 2],
    pub rows: [SummaryRow; 4],
}

impl SummaryTable {
    /// Header row included.
    pub fn row_count(&self) -> usize {
        1 + self.rows.len()
    }

    pub fn cells(&self) -> Vec<[&'static str; 2]> {
        std::iter::once(self.header)
            .chain(
                self.rows
                    .iter()
                    .map(|row| [row.dimension.label(), row.grade.label()]),
            )
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text { style: TextStyle, text: String },
    Item(ItemBlock),
    /// Vertical gap, in millimetres.
    Spacer(u8),
    Table(SummaryTable),
}

impl Block {
    fn text(style: TextStyle, text: impl Into<String>) -> Self {
        Self::Text {
            style,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl DocumentLayout {
    pub fn headings(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Text {
                    style: TextStyle::Heading,
                    text,
                } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Item(item) => Some(item),
            _ => None,
        })
    }

    pub fn summary_table(&self) -> Option<&SummaryTable> {
        self.blocks.iter().find_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }
}

pub fn layout(report: &AuditReport) -> DocumentLayout {
    let metadata = report.metadata();
    let mut blocks = vec![Block::text(TextStyle::Title, DOCUMENT_TITLE)];
    blocks.extend(
        ATTRIBUTION
            .iter()
            .map(|line| Block::text(TextStyle::Body, *line)),
    );
    blocks.push(Block::Spacer(4));
    blocks.push(Block::text(
        TextStyle::Body,
        format!("監査者名：{}", metadata.reviewer_name),
    ));
    blocks.push(Block::text(
        TextStyle::Body,
        format!("監査日：{}", metadata.review_date.format("%Y-%m-%d")),
    ));
    blocks.push(Block::Spacer(6));

    // Responses are in definition order, so a category change starts a section.
    let mut current_category: Option<&str> = None;
    for response in report.responses() {
        if current_category != Some(response.category) {
            if current_category.is_some() {
                blocks.push(Block::Spacer(4));
            }
            blocks.push(Block::text(TextStyle::Heading, response.category));
            current_category = Some(response.category);
        }
        blocks.push(Block::Item(ItemBlock::from_response(response)));
    }

    blocks.push(Block::Spacer(4));
    blocks.push(Block::text(TextStyle::Heading, SPECIAL_NOTES_HEADING));
    blocks.push(Block::text(
        TextStyle::Body,
        metadata.special_notes.clone(),
    ));

    blocks.push(Block::Spacer(6));
    blocks.push(Block::text(TextStyle::Heading, EVALUATION_HEADING));
    blocks.push(Block::Table(SummaryTable {
        header: SUMMARY_HEADER,
        rows: metadata
            .evaluations
            .entries()
            .map(|(dimension, grade)| SummaryRow { dimension, grade }),
    }));

    DocumentLayout {
        title: DOCUMENT_TITLE.to_string(),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::checklist::ChecklistDefinition;
    use crate::audit::collector::FormInput;
    use crate::audit::domain::ItemStatus;
    use crate::audit::report::ReviewDraft;
    use chrono::NaiveDate;

    fn report() -> AuditReport {
        let definition = ChecklistDefinition::standard();
        let mut input = FormInput::defaults(&definition);
        input.set_status("QA/QCの体制と人員", ItemStatus::Confirmed);
        input.set_comment("QA/QCの体制と人員", "2名体制");
        let draft = ReviewDraft::new(
            "山本修司",
            NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date"),
        )
        .with_notes("特記事項なし")
        .with_uniform_grade(Grade::Good)
        .with_grade(EvaluationDimension::SopEffectiveness, Grade::Acceptable);
        AuditReport::from_form(&definition, &input, draft).expect("report assembles")
    }

    #[test]
    fn layout_opens_with_title_attribution_and_reviewer_block() {
        let layout = layout(&report());

        assert_eq!(
            layout.blocks[0],
            Block::text(TextStyle::Title, DOCUMENT_TITLE)
        );
        assert_eq!(layout.blocks[1], Block::text(TextStyle::Body, "株式会社リジット"));
        assert!(layout
            .blocks
            .contains(&Block::text(TextStyle::Body, "監査者名：山本修司")));
        assert!(layout
            .blocks
            .contains(&Block::text(TextStyle::Body, "監査日：2024-04-01")));
    }

    #[test]
    fn sections_follow_category_order_then_notes_and_evaluation() {
        let definition = ChecklistDefinition::standard();
        let layout = layout(&report());

        let mut expected: Vec<&str> = definition
            .categories()
            .iter()
            .map(|category| category.name)
            .collect();
        expected.push(SPECIAL_NOTES_HEADING);
        expected.push(EVALUATION_HEADING);
        assert_eq!(layout.headings(), expected);
        assert_eq!(layout.items().count(), definition.item_count());
    }

    #[test]
    fn item_blocks_show_label_status_and_comment() {
        let layout = layout(&report());
        let qa = layout
            .items()
            .find(|item| item.label == "QA/QCの体制と人員")
            .expect("qa item");

        assert_eq!(
            qa.lines(),
            [
                "項目：QA/QCの体制と人員".to_string(),
                "対応状況：確認済".to_string(),
                "コメント：2名体制".to_string(),
            ]
        );
    }

    #[test]
    fn summary_table_has_header_and_four_rows_in_fixed_order() {
        let layout = layout(&report());
        let table = layout.summary_table().expect("summary table");

        assert_eq!(table.row_count(), 5);
        assert_eq!(
            table.cells(),
            vec![
                ["評価項目", "評価"],
                ["総合的な体制整備", "良"],
                ["SOP運用の実効性", "可"],
                ["データ管理とセキュリティ", "良"],
                ["継続的改善の姿勢", "良"],
            ]
        );
    }
}
