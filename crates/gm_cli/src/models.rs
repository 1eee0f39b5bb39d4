use gamemaster::{Classifier, IngestReport, Rejection};
use heck::ToTitleCase;
use serde::Serialize;

#[derive(Serialize, Debug, Default, Clone)]
pub struct Summary {
    pub status: String,
    pub entries: usize,
    pub moves: usize,
    pub creatures: usize,
    pub skipped: usize,
    pub deferred: usize,
    pub resolution_passes: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<RejectionInfo>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RejectionInfo {
    pub template_id: String,
    /// Title cased entry name, e.g. `Rattata Alola`.
    pub name: String,
    pub token: usize,
    pub error: String,
}

impl RejectionInfo {
    pub fn new(rejection: &Rejection, classifier: &Classifier) -> Self {
        Self {
            template_id: rejection.template_id.clone(),
            name: display_name(&rejection.template_id, classifier),
            token: rejection.token,
            error: rejection.error.to_string(),
        }
    }
}

impl Summary {
    pub fn new(report: &IngestReport, classifier: &Classifier) -> Self {
        Self {
            status: if report.rejections.is_empty() {
                "ok".to_string()
            } else {
                "partial".to_string()
            },
            entries: report.entries,
            moves: report.moves,
            creatures: report.creatures,
            skipped: report.skipped,
            deferred: report.deferred,
            resolution_passes: report.resolution_passes,
            rejections: report
                .rejections
                .iter()
                .map(|r| RejectionInfo::new(r, classifier))
                .collect(),
        }
    }
}

/// Name portion of a template id in title case, or the whole id when it
/// does not classify.
pub fn display_name(template_id: &str, classifier: &Classifier) -> String {
    let kind = classifier.classify(template_id);
    classifier
        .template_parts(kind, template_id)
        .map(|parts| parts.name)
        .unwrap_or(template_id)
        .to_title_case()
}
