//! アセットバンドル
//!
//! ロゴ・経営陣写真・ポートフォリオ画像をData URIで保持する。
//! ポートフォリオ画像はAI生成/編集で1枚単位に丸ごと置き換わる。

use crate::data_uri::DataUri;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ポートフォリオ画像のキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortfolioKey {
    SawitPlantation,
    SawitMill,
    FisheryOcean,
    FisheryColdStorage,
    FarmVegetables,
    FarmDistribution,
}

impl PortfolioKey {
    /// 宣言順（一括生成もこの順で処理する）
    pub const ALL: [PortfolioKey; 6] = [
        PortfolioKey::SawitPlantation,
        PortfolioKey::SawitMill,
        PortfolioKey::FisheryOcean,
        PortfolioKey::FisheryColdStorage,
        PortfolioKey::FarmVegetables,
        PortfolioKey::FarmDistribution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PortfolioKey::SawitPlantation => "sawitPlantation",
            PortfolioKey::SawitMill => "sawitMill",
            PortfolioKey::FisheryOcean => "fisheryOcean",
            PortfolioKey::FisheryColdStorage => "fisheryColdStorage",
            PortfolioKey::FarmVegetables => "farmVegetables",
            PortfolioKey::FarmDistribution => "farmDistribution",
        }
    }
}

impl fmt::Display for PortfolioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortfolioKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PortfolioKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownKey(s.to_string()))
    }
}

/// ポートフォリオ画像6枚
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub sawit_plantation: DataUri,
    pub sawit_mill: DataUri,
    pub fishery_ocean: DataUri,
    pub fishery_cold_storage: DataUri,
    pub farm_vegetables: DataUri,
    pub farm_distribution: DataUri,
}

impl Portfolio {
    /// 全キーに同じ画像を入れて作成
    pub fn filled(image: &DataUri) -> Self {
        Self {
            sawit_plantation: image.clone(),
            sawit_mill: image.clone(),
            fishery_ocean: image.clone(),
            fishery_cold_storage: image.clone(),
            farm_vegetables: image.clone(),
            farm_distribution: image.clone(),
        }
    }

    pub fn get(&self, key: PortfolioKey) -> &DataUri {
        match key {
            PortfolioKey::SawitPlantation => &self.sawit_plantation,
            PortfolioKey::SawitMill => &self.sawit_mill,
            PortfolioKey::FisheryOcean => &self.fishery_ocean,
            PortfolioKey::FisheryColdStorage => &self.fishery_cold_storage,
            PortfolioKey::FarmVegetables => &self.farm_vegetables,
            PortfolioKey::FarmDistribution => &self.farm_distribution,
        }
    }

    /// 1枚を丸ごと置き換え
    pub fn set(&mut self, key: PortfolioKey, image: DataUri) {
        let slot = match key {
            PortfolioKey::SawitPlantation => &mut self.sawit_plantation,
            PortfolioKey::SawitMill => &mut self.sawit_mill,
            PortfolioKey::FisheryOcean => &mut self.fishery_ocean,
            PortfolioKey::FisheryColdStorage => &mut self.fishery_cold_storage,
            PortfolioKey::FarmVegetables => &mut self.farm_vegetables,
            PortfolioKey::FarmDistribution => &mut self.farm_distribution,
        };
        *slot = image;
    }
}

/// デッキで使う画像一式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBundle {
    pub logo: DataUri,
    pub management_photos: Vec<DataUri>,
    pub portfolio: Portfolio,
}

/// バンドル内の画像への参照（エクスポータが画像を引くのに使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRef {
    Logo,
    Management(usize),
    Portfolio(PortfolioKey),
}

impl AssetBundle {
    pub fn get(&self, asset: AssetRef) -> Option<&DataUri> {
        match asset {
            AssetRef::Logo => Some(&self.logo),
            AssetRef::Management(index) => self.management_photos.get(index),
            AssetRef::Portfolio(key) => Some(self.portfolio.get(key)),
        }
    }

    /// バンドルに含まれる全参照（重複なし、出現順）
    pub fn refs(&self) -> Vec<AssetRef> {
        let mut refs = vec![AssetRef::Logo];
        refs.extend((0..self.management_photos.len()).map(AssetRef::Management));
        refs.extend(PortfolioKey::ALL.into_iter().map(AssetRef::Portfolio));
        refs
    }
}

/// 取得元URL（サーバー側でData URIへ解決する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSources {
    pub entries: Vec<(PortfolioKey, String)>,
}

impl PortfolioSources {
    pub fn url(&self, key: PortfolioKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, url)| url.as_str())
    }
}
