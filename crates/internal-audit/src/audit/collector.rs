use super::checklist::ChecklistDefinition;
use super::domain::{AuditError, ItemResponse, ItemStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current answer for one checklist item as supplied by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAnswer {
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub comment: String,
}

impl ItemAnswer {
    pub fn new(status: ItemStatus, comment: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            comment: comment.into(),
        }
    }
}

/// Per-item form state keyed by item label, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormInput {
    answers: BTreeMap<String, ItemAnswer>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial form state: every item unconfirmed with an empty comment.
    pub fn defaults(definition: &ChecklistDefinition) -> Self {
        let answers = definition
            .items()
            .map(|item| {
                (
                    item.label.to_string(),
                    ItemAnswer::new(ItemStatus::default(), ""),
                )
            })
            .collect();
        Self { answers }
    }

    pub fn answer(&self, label: &str) -> Option<&ItemAnswer> {
        self.answers.get(label)
    }

    pub fn set_answer(&mut self, label: impl Into<String>, answer: ItemAnswer) {
        self.answers.insert(label.into(), answer);
    }

    pub fn set_status(&mut self, label: &str, status: ItemStatus) {
        self.answers.entry(label.to_string()).or_default().status = Some(status);
    }

    pub fn set_comment(&mut self, label: &str, comment: impl Into<String>) {
        self.answers.entry(label.to_string()).or_default().comment = comment.into();
    }

    pub fn clear_status(&mut self, label: &str) {
        if let Some(answer) = self.answers.get_mut(label) {
            answer.status = None;
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Pairs every checklist item with its answer, preserving definition order.
///
/// Answers for labels outside the definition are ignored. The first item
/// without a status aborts collection with [`AuditError::MissingInput`].
pub fn collect_responses(
    definition: &ChecklistDefinition,
    input: &FormInput,
) -> Result<Vec<ItemResponse>, AuditError> {
    let mut responses = Vec::with_capacity(definition.item_count());

    for item in definition.items() {
        let answer = input.answer(item.label);
        let status = answer
            .and_then(|answer| answer.status)
            .ok_or(AuditError::MissingInput {
                category: item.category,
                label: item.label,
            })?;
        let comment = answer
            .map(|answer| answer.comment.clone())
            .unwrap_or_default();

        responses.push(ItemResponse {
            category: item.category,
            label: item.label,
            status,
            comment,
        });
    }

    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_one_unconfirmed_response_per_item() {
        let definition = ChecklistDefinition::standard();
        let input = FormInput::defaults(&definition);

        let responses = collect_responses(&definition, &input).expect("defaults are complete");

        assert_eq!(responses.len(), definition.item_count());
        for (response, item) in responses.iter().zip(definition.items()) {
            assert_eq!(response.item(), item);
            assert_eq!(response.status, ItemStatus::Unconfirmed);
            assert!(response.comment.is_empty());
        }
    }

    #[test]
    fn answers_are_applied_by_label() {
        let definition = ChecklistDefinition::standard();
        let mut input = FormInput::defaults(&definition);
        input.set_status("データのバックアップ体制（頻度、手段）", ItemStatus::NeedsCorrection);
        input.set_comment("データのバックアップ体制（頻度、手段）", "バックアップ未確認");

        let responses = collect_responses(&definition, &input).expect("collects");
        let backup = responses
            .iter()
            .find(|response| response.label == "データのバックアップ体制（頻度、手段）")
            .expect("backup item present");

        assert_eq!(backup.category, "3. データ・文書管理");
        assert_eq!(backup.status, ItemStatus::NeedsCorrection);
        assert_eq!(backup.comment, "バックアップ未確認");
    }

    #[test]
    fn missing_status_reports_the_first_unanswered_item() {
        let definition = ChecklistDefinition::standard();
        let mut input = FormInput::defaults(&definition);
        input.clear_status("QA/QCの体制と人員");
        input.clear_status("教育訓練の記録・更新状況");

        let err = collect_responses(&definition, &input).expect_err("status missing");
        assert_eq!(
            err,
            AuditError::MissingInput {
                category: "2. 品質保証と監査体制",
                label: "QA/QCの体制と人員",
            }
        );
    }

    #[test]
    fn comment_without_status_is_still_missing_input() {
        let definition = ChecklistDefinition::standard();
        let mut input = FormInput::new();
        input.set_comment("会社概要・所在地・人員構成", "所在地変更あり");

        let err = collect_responses(&definition, &input).expect_err("no statuses supplied");
        assert!(matches!(
            err,
            AuditError::MissingInput {
                label: "会社概要・所在地・人員構成",
                ..
            }
        ));
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let definition = ChecklistDefinition::standard();
        let mut input = FormInput::defaults(&definition);
        input.set_answer("存在しない項目", ItemAnswer::new(ItemStatus::Confirmed, "x"));

        let responses = collect_responses(&definition, &input).expect("collects");
        assert_eq!(responses.len(), definition.item_count());
        assert!(responses
            .iter()
            .all(|response| response.label != "存在しない項目"));
    }

    #[test]
    fn form_input_deserializes_from_label_keyed_json() {
        let input: FormInput = serde_json::from_str(
            r#"{"会社概要・所在地・人員構成": {"status": "確認済", "comment": "最新"},
                "QA/QCの体制と人員": {"status": "needs_correction"}}"#,
        )
        .expect("valid payload");

        assert_eq!(input.len(), 2);
        let qa = input.answer("QA/QCの体制と人員").expect("qa answer");
        assert_eq!(qa.status, Some(ItemStatus::NeedsCorrection));
        assert!(qa.comment.is_empty());
    }
}
