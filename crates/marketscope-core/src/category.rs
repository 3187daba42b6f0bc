use serde::{Deserialize, Serialize};

/// Closed set of market categories used to key catalog lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Smartphone,
    ElectricVehicle,
    Sportswear,
    Ecommerce,
    VideoStreaming,
    MusicStreaming,
    RideHailing,
    ShortTermRental,
    CoffeeChain,
    FastFood,
    GeneralConsumer,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Smartphone,
        Category::ElectricVehicle,
        Category::Sportswear,
        Category::Ecommerce,
        Category::VideoStreaming,
        Category::MusicStreaming,
        Category::RideHailing,
        Category::ShortTermRental,
        Category::CoffeeChain,
        Category::FastFood,
        Category::GeneralConsumer,
    ];

    /// Returned by the classifier when no keyword matches.
    pub const GENERIC: Category = Category::GeneralConsumer;

    /// Machine identifier, identical to the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Smartphone => "smartphone",
            Category::ElectricVehicle => "electric_vehicle",
            Category::Sportswear => "sportswear",
            Category::Ecommerce => "ecommerce",
            Category::VideoStreaming => "video_streaming",
            Category::MusicStreaming => "music_streaming",
            Category::RideHailing => "ride_hailing",
            Category::ShortTermRental => "short_term_rental",
            Category::CoffeeChain => "coffee_chain",
            Category::FastFood => "fast_food",
            Category::GeneralConsumer => "general_consumer",
        }
    }

    /// Display label used in report text and prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Smartphone => "智能手机市场",
            Category::ElectricVehicle => "电动汽车市场",
            Category::Sportswear => "运动鞋服市场",
            Category::Ecommerce => "电商平台市场",
            Category::VideoStreaming => "流媒体市场",
            Category::MusicStreaming => "音乐流媒体市场",
            Category::RideHailing => "网约车市场",
            Category::ShortTermRental => "短租住宿市场",
            Category::CoffeeChain => "咖啡连锁市场",
            Category::FastFood => "快餐连锁市场",
            Category::GeneralConsumer => "通用消费品市场",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: '{s}'"))
    }
}
