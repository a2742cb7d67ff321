// Static narrative text shown alongside the analysis pages.
// Markdown, reproduced verbatim; nothing here is derived from the data.

pub const KEY_OBJECTIVES: &str = r#"### Key Objectives
- **성별 그룹별 사기율을 파악하기**
- **연령대별 사기율을 분석하기**
- **총 고객, 정책 및 청구에 대한 통찰력을 얻기기**"#;

/// Caption for the ad-hoc example query (see `catalog::TOP_CLAIMANTS_SQL`)
pub const TOP_CLAIMANTS_CAPTION: &str = "가장 많은 청구를 한 상위 10대 고객";

pub const SUMMARY_REPORT: &str = r#"### 1. 성별과 사기
- **관찰**: 여성 고객의 사기율이 남성 고객보다 더 높게 나타났다. 이는 특정 패턴이나 정책이 특정 그룹을 더 취약하게 만들거나, 검출이 더 용이하게 작용했을 가능성이 있다.

### 2. 연령대와 사기
- **관찰**: 30~60세 연령대 고객의 사기율이 가장 높게 나타났다. 이 연령대는 보험 가입 및 클레임 활동이 가장 활발한 경제 활동 인구층이다.

### 3. 보험 상품
- **관찰**: 보험 상품별로 사기율이 크게 다르게 나타났다. 특히 고가치 또는 고위험 상품에서 사기 비율이 높은 경향이 있다."#;

pub const RECOMMENDATIONS: &str = r#"### 추천 사항
- **고급 분석 기술 활용**: 실시간 사기 탐지를 위해 AI 및 머신러닝 모델 개발
- **고객 교육 강화**: 고위험 인구통계학적 집단을 대상으로 한 보험 사기 위험에 대한 인식 캠페인 실시
- **사기 탐지 프로세스 맞춤화**: 연령, 성별, 상품 분석에서 도출된 위험 프로필을 기반으로 검증 절차 최적
- **사기 모니터링 시스템 도입**: 과거 데이터 및 분석을 활용하여 고위험 거래를 자동으로 감지할 수 있는 도구 배치

---

### 세부 실행 계획

#### 1. 연령대별 사기
- **고위험 연령대**: 30~60세 고객의 사기율이 가장 높다.
- **실행 계획**:
1. 이 연령대에서 접수된 청구에 대해 이상 금액 및 빈도를 확인하는 추가 검증 단계를 만든다.
2. 이 연령대에서 나타나는 의심스러운 행동 패턴을 인지할 수 있도록 보험 담당자를 훈련한다.
3. 사기 탐지 AI 모델에서 연령을 가중치 요소로 포함시켜 위험 평가의 정확도를 높인다.

#### 2. 성별별 사기
- **고위험 그룹**: 여성 고객의 사기율이 남성 고객보다 높게 나타났다.
- **실행 계획**:
1. 여성 고객의 청구 처리 방식에서 암묵적인 편향이 없는지 확인하기 위해 기존 정책을 검토한다.
2. 여성 고객에서 발생하는 사기 사례의 유형과 상품을 세부적으로 분석한다.
3. 사기 사례를 분석하고, 이를 기반으로 성별별 패턴을 탐지하기 위한 알고리즘을 지속적으로 개선한다.

#### 3. 보험 상품별 사기
- **고위험 상품**: 정기, 어린이저축, 일반저축, 교육, 일반연금이 높은 사기율을 보인다.
- **실행 계획**:
1. 이러한 상품의 고유 특성을 반영한 상품별 사기 탐지 알고리즘을 개발한다.
2. 정기적인 감사 절차를 통해 고위험 상품에서 발생하는 패턴과 악용 사례를 확인한다.
3. 보험 약관을 세부적으로 검토하여 사기에 악용될 수 있는 허점을 제거하기 위해 언더라이터와 협력한다.
4. 고위험 청구에 대해 자동 검토를 트리거할 수 있는 청구 상한선을 도입한다.

---

### 최종 메모
이 실행 계획은 사기 탐지 능력을 강화하고, 위험을 최소화하며, 공정성과 투명성을 유지하면서 전반적인 청구 프로세스를 최적화하는 것을 목표로 한다."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeSection {
    SummaryReport,
    Recommendations,
}

impl NarrativeSection {
    pub fn title(&self) -> &'static str {
        match self {
            NarrativeSection::SummaryReport => "Summary Report",
            NarrativeSection::Recommendations => "Recommendations & Action Plan",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            NarrativeSection::SummaryReport => SUMMARY_REPORT,
            NarrativeSection::Recommendations => RECOMMENDATIONS,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            NarrativeSection::SummaryReport => NarrativeSection::Recommendations,
            NarrativeSection::Recommendations => NarrativeSection::SummaryReport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_are_distinct_markdown() {
        assert!(SUMMARY_REPORT.starts_with("### 1."));
        assert!(RECOMMENDATIONS.starts_with("### 추천 사항"));
        assert!(KEY_OBJECTIVES.starts_with("### Key Objectives"));
        assert_eq!(
            NarrativeSection::SummaryReport.toggle().text(),
            RECOMMENDATIONS
        );
    }
}
