//! Verdict aggregation.

use crate::domain::{ClauseVerdict, OverallStatus, OverallVerdict, Status};

/// Reduce clause verdicts to one overall verdict.
///
/// Any non-compliant clause makes the whole evaluation non-compliant; else
/// any partially compliant clause makes it "compliant with amendment".
/// Unknown clauses are advisory and never block a compliant result.
pub fn aggregate(verdicts: &[ClauseVerdict]) -> OverallVerdict {
    let any = |status: Status| verdicts.iter().any(|v| v.status == status);

    let status = if any(Status::NonCompliant) {
        OverallStatus::NonCompliant
    } else if any(Status::PartiallyCompliant) {
        OverallStatus::PartiallyCompliant
    } else if verdicts
        .iter()
        .all(|v| matches!(v.status, Status::Compliant | Status::Unknown))
    {
        OverallStatus::Compliant
    } else {
        OverallStatus::NeedsReview
    };

    OverallVerdict::new(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClauseKind;

    fn verdict(status: Status) -> ClauseVerdict {
        ClauseVerdict {
            clause: ClauseKind::Channels,
            facet: None,
            clause_label: "Kanal Sayısı".to_string(),
            requirement_view: "en az 4 kanal".to_string(),
            device_view: "4 kanal".to_string(),
            status,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_non_compliant_dominates() {
        let verdicts = vec![
            verdict(Status::Compliant),
            verdict(Status::PartiallyCompliant),
            verdict(Status::NonCompliant),
            verdict(Status::Unknown),
        ];
        assert_eq!(aggregate(&verdicts).status, OverallStatus::NonCompliant);
    }

    #[test]
    fn test_partial_means_amendment() {
        let verdicts = vec![verdict(Status::Unknown), verdict(Status::PartiallyCompliant)];
        let overall = aggregate(&verdicts);
        assert_eq!(overall.status, OverallStatus::PartiallyCompliant);
        assert_eq!(overall.label, "🟡 Zeyil ile Uygun");
    }

    #[test]
    fn test_unknown_does_not_block_compliant() {
        let verdicts = vec![verdict(Status::Unknown), verdict(Status::Compliant)];
        assert_eq!(aggregate(&verdicts).status, OverallStatus::Compliant);

        let verdicts = vec![verdict(Status::Unknown)];
        assert_eq!(aggregate(&verdicts).status, OverallStatus::Compliant);
    }
}
