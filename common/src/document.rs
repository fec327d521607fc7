//! プレゼンテーション文書の型定義
//!
//! サーバーが静的に構築し、`/api/deck-data` でクライアントへ渡す。
//! JSONのフィールド名はcamelCase。ロード後は変更しない。

use crate::assets::PortfolioKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementTeamMember {
    pub name: String,
    pub title: String,
    pub photo_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeInfo {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub logo_url: String,
    pub management_team: Vec<ManagementTeamMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    pub title: String,
    pub subtitle: String,
    /// 表示用の年月（例: "Oktober 2026"）
    pub date: String,
    pub office: OfficeInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatement {
    pub title: String,
    pub points: Vec<String>,
    pub opportunity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pillar {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub title: String,
    pub pillars: Vec<Pillar>,
    pub differentiators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    pub title: String,
    pub sawit: String,
    pub perikanan: String,
    pub pertanian: String,
    pub tam: String,
    pub sam: String,
    pub som: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessModel {
    pub title: String,
    pub revenue_streams: Vec<String>,
    pub cost_structure: Vec<String>,
    pub scalability: String,
}

/// セクター（パーム油・漁業・農業）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub name: String,
    pub value_chain: String,
    pub operations: Vec<String>,
    pub partners: Vec<String>,
    pub capacity: String,
    pub locations: Vec<String>,
    /// スライドに載せるポートフォリオ画像のキー
    pub photos: Vec<PortfolioKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sectors {
    pub sawit: Sector,
    pub perikanan: Sector,
    pub pertanian: Sector,
}

/// セクターの識別子（スライド順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorKey {
    Sawit,
    Perikanan,
    Pertanian,
}

impl SectorKey {
    pub const ALL: [SectorKey; 3] = [SectorKey::Sawit, SectorKey::Perikanan, SectorKey::Pertanian];

    /// 1始まりの番号
    pub fn ordinal(self) -> usize {
        match self {
            SectorKey::Sawit => 1,
            SectorKey::Perikanan => 2,
            SectorKey::Pertanian => 3,
        }
    }

    /// スライド見出し
    pub fn display_name(self) -> &'static str {
        match self {
            SectorKey::Sawit => "Kelapa Sawit",
            SectorKey::Perikanan => "Perikanan",
            SectorKey::Pertanian => "Pertanian",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectorKey::Sawit => "sawit",
            SectorKey::Perikanan => "perikanan",
            SectorKey::Pertanian => "pertanian",
        }
    }
}

impl Sectors {
    pub fn get(&self, key: SectorKey) -> &Sector {
        match key {
            SectorKey::Sawit => &self.sawit,
            SectorKey::Perikanan => &self.perikanan,
            SectorKey::Pertanian => &self.pertanian,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectorKey, &Sector)> + '_ {
        SectorKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swot {
    pub strengths: String,
    pub weaknesses: String,
    pub opportunities: String,
    pub threats: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    pub farmers: String,
    pub employment: String,
    pub income: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traction {
    pub partnerships: Vec<String>,
    pub infrastructure: Vec<String>,
    pub technology: Vec<String>,
    pub impact: Impact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub title: String,
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub phase1: RoadmapPhase,
    pub phase2: RoadmapPhase,
    pub phase3: RoadmapPhase,
}

impl Roadmap {
    pub fn phases(&self) -> [&RoadmapPhase; 3] {
        [&self.phase1, &self.phase2, &self.phase3]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub risk: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentAsk {
    pub title: String,
    pub use_of_funds: Vec<String>,
    pub rationale: Vec<String>,
    pub investor_return: Vec<String>,
}

/// デッキ全体の文書
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationDocument {
    pub meta: MetaData,
    pub executive_summary: Vec<String>,
    pub problem_statement: ProblemStatement,
    pub solution: Solution,
    pub market_overview: MarketOverview,
    pub business_model: BusinessModel,
    pub sectors: Sectors,
    pub competitive_advantages: Vec<String>,
    pub swot: Swot,
    pub traction: Traction,
    pub roadmap: Roadmap,
    pub risks: Vec<Risk>,
    pub investment_ask: InvestmentAsk,
    pub closing: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_iteration_order() {
        let sectors = Sectors::default();
        let keys: Vec<SectorKey> = sectors.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, SectorKey::ALL.to_vec());
        assert_eq!(SectorKey::Pertanian.ordinal(), 3);
    }

    #[test]
    fn test_document_serialize_camel_case() {
        let mut doc = PresentationDocument::default();
        doc.executive_summary = vec!["Ringkasan".to_string()];
        doc.investment_ask.use_of_funds = vec!["Infrastruktur".to_string()];

        let json = serde_json::to_string(&doc).expect("シリアライズ失敗");
        assert!(json.contains("\"executiveSummary\":[\"Ringkasan\"]"));
        assert!(json.contains("\"useOfFunds\":[\"Infrastruktur\"]"));
        assert!(json.contains("\"managementTeam\""));
    }

    #[test]
    fn test_sector_photos_deserialize_as_keys() {
        let json = r#"{
            "name": "Ekosistem Sawit Terpadu",
            "valueChain": "Pembibitan → Penjualan",
            "operations": [],
            "partners": [],
            "capacity": "",
            "locations": [],
            "photos": ["sawitPlantation", "sawitMill"]
        }"#;

        let sector: Sector = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(sector.photos, vec![PortfolioKey::SawitPlantation, PortfolioKey::SawitMill]);
    }
}
