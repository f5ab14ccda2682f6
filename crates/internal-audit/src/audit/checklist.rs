use super::domain::ChecklistItem;

/// Heading of the free-text section that follows the numbered categories.
pub const SPECIAL_NOTES_HEADING: &str = "7. 特記事項";

#[derive(Debug, Clone)]
pub struct ChecklistCategory {
    pub name: &'static str,
    pub items: Vec<&'static str>,
}

/// Ordered category → item mapping rendered as the audit form.
#[derive(Debug, Clone)]
pub struct ChecklistDefinition {
    categories: Vec<ChecklistCategory>,
}

impl ChecklistDefinition {
    pub fn standard() -> Self {
        Self {
            categories: standard_categories(),
        }
    }

    pub fn new(categories: Vec<ChecklistCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[ChecklistCategory] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&ChecklistCategory> {
        self.categories
            .iter()
            .find(|category| category.name == name)
    }

    /// Flattened items in definition order.
    pub fn items(&self) -> impl Iterator<Item = ChecklistItem> + '_ {
        self.categories.iter().flat_map(|category| {
            category.items.iter().copied().map(move |label| ChecklistItem {
                category: category.name,
                label,
            })
        })
    }

    pub fn item_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.items.len())
            .sum()
    }
}

fn standard_categories() -> Vec<ChecklistCategory> {
    vec![
        ChecklistCategory {
            name: "1. 会社情報と体制",
            items: vec![
                "会社概要・所在地・人員構成",
                "組織図（最新版）と役割の明確化",
                "主要な受託業務と実績の記録",
            ],
        },
        ChecklistCategory {
            name: "2. 品質保証と監査体制",
            items: vec![
                "QA/QCの体制と人員",
                "SOPに基づく監査計画の有無",
                "監査結果とCAPA（是正措置）管理",
                "SOPの管理・改訂履歴の確認",
            ],
        },
        ChecklistCategory {
            name: "3. データ・文書管理",
            items: vec![
                "データのバックアップ体制（頻度、手段）",
                "電子データの保管場所・セキュリティ",
                "文書保管規定・旧版管理の有無",
            ],
        },
        ChecklistCategory {
            name: "4. 教育・訓練",
            items: vec![
                "教育研修SOPの整備状況",
                "教育訓練の記録・更新状況",
                "専門的スキル・資格の保有状況",
            ],
        },
        ChecklistCategory {
            name: "5. システムとセキュリティ",
            items: vec![
                "施設の入退室管理（物理的セキュリティ）",
                "システムバリデーション（CSV）の有無",
                "クラウドやNASの安全性とログ管理",
            ],
        },
        ChecklistCategory {
            name: "6. プロジェクト管理",
            items: vec![
                "プロジェクト指名書・責任者の明確化",
                "業務手順の一貫性と記録の整備",
            ],
        },
    ]
}
