/// 地圖上的關卡數
pub const STAGE_COUNT: usize = 5;
/// 勝利後提供的獎勵數
pub const LOOT_COUNT: usize = 3;

// 存檔鍵值
pub const STAGE_KEY: &str = "stage";
pub const INVENTORY_KEY: &str = "inventory";
/// 剛打完一場的暫時標記，地圖讀取一次後清除
pub const PLAYED_KEY: &str = "played";
