//! Amendment ("zeyil") text generation.
//!
//! Only partially compliant clauses get a suggestion. Exactly one template
//! applies, tried in this order: reagent barcode, reading method, Factor
//! test, generic.

use crate::domain::{ClauseKind, ClauseVerdict, Facet};

/// Suggested amendment text for a verdict, or `None` unless the verdict is
/// partially compliant
pub fn amendment_text(verdict: &ClauseVerdict) -> Option<String> {
    if !verdict.needs_amendment() {
        return None;
    }

    let template = Template::select(verdict);
    Some(template.render(verdict))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    ReagentBarcode,
    ReadingMethod,
    Factor,
    Generic,
}

impl Template {
    fn select(verdict: &ClauseVerdict) -> Self {
        if verdict.facet == Some(Facet::ReagentBarcode) {
            Template::ReagentBarcode
        } else if verdict.clause == ClauseKind::ReadingMethod {
            Template::ReadingMethod
        } else if verdict.facet == Some(Facet::FactorTest) {
            Template::Factor
        } else {
            Template::Generic
        }
    }

    fn render(self, verdict: &ClauseVerdict) -> String {
        match self {
            Template::ReagentBarcode => format!(
                "Zeyil önerisi ({}): Reaktif barkod okuyucusu bulunmayan cihazlarda reaktif \
                 tanımlamasının manuel giriş veya harici barkod okuyucu ile yapılması kabul \
                 edilmelidir. Reaktif lot ve son kullanma takibi cihaz yazılımı üzerinden \
                 sağlanmaktadır.",
                verdict.clause_label
            ),
            Template::ReadingMethod => format!(
                "Zeyil önerisi ({}): \"Mekanik pıhtı algılama\" ifadesinin \"manyetik veya \
                 mekanik pıhtı algılama prensibi ile çalışan\" şeklinde düzenlenmesi talep \
                 edilir. Manyetik okuma prensibi pıhtı oluşumunu bilyenin hareketindeki \
                 değişimle algıladığından mekanik yöntemle eşdeğerdir. ({})",
                verdict.clause_label, verdict.explanation
            ),
            Template::Factor => format!(
                "Zeyil önerisi ({}): Faktör testlerinin cihazda çalışılamaması durumunda, \
                 numunelerin yüklenici firma tarafından dış/referans laboratuvara gönderilerek \
                 sonuçlandırılması kabul edilmelidir.",
                verdict.clause_label
            ),
            Template::Generic => format!(
                "Zeyil önerisi ({}): {} Aynı sonucu sağlayan eşdeğer yöntem kabul edilmelidir.",
                verdict.clause_label, verdict.explanation
            ),
        }
    }
}
