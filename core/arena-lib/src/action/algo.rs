//! 本檔案僅收錄「有名且有固定公式」的演算法。
//! 例如：BFS 最短步數、路徑回溯。
//! 若為專案自訂、僅用於單一場景的邏輯，請勿放於此處。
use crate::*;
use std::collections::VecDeque;

/// 路徑搜尋專用棋盤介面，供 bfs 與 backtrack_path 使用
pub trait PathfindingBoard {
    /// 棋盤大小 (rows, cols)
    fn dimensions(&self) -> (usize, usize);
    /// 判斷座標是否在棋盤內
    fn is_valid(&self, pos: Pos) -> bool;
    /// 判斷座標是否可通行
    fn is_passable(&self, pos: Pos) -> bool;
    /// 取得鄰近座標，順序即為檢查順序
    fn get_neighbors(&self, pos: Pos) -> Vec<Pos>;
}

/// 每格距起點的步數，None 代表無法到達
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    rows: usize,
    cols: usize,
    dist: Vec<Option<MovementCost>>,
}

impl DistanceField {
    pub fn unreachable(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            dist: vec![None; rows * cols],
        }
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row < self.rows && pos.col < self.cols {
            Some(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    pub fn get(&self, pos: Pos) -> Option<MovementCost> {
        self.index(pos).and_then(|i| self.dist[i])
    }

    fn set(&mut self, pos: Pos, cost: MovementCost) {
        if let Some(i) = self.index(pos) {
            self.dist[i] = Some(cost);
        }
    }

    /// 所有可到達的格子與步數（含起點），依索引排序
    pub fn reachable(&self) -> impl Iterator<Item = (Pos, MovementCost)> + '_ {
        self.dist.iter().enumerate().filter_map(|(i, d)| {
            d.map(|d| {
                (
                    Pos {
                        row: i / self.cols,
                        col: i % self.cols,
                    },
                    d,
                )
            })
        })
    }
}

/// 廣度優先搜尋：邊權皆為 1，取得的步數即為最短步數
/// 只擴展到棋盤內、可通行、且步數不超過 budget 的格子
pub fn bfs(graph: &impl PathfindingBoard, start: Pos, budget: MovementCost) -> DistanceField {
    let (rows, cols) = graph.dimensions();
    let mut field = DistanceField::unreachable(rows, cols);
    if !graph.is_valid(start) {
        return field;
    }
    field.set(start, 0);

    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let Some(current_dist) = field.get(current) else {
            continue;
        };
        let next_dist = current_dist + 1;
        if next_dist > budget {
            continue;
        }
        for next in graph.get_neighbors(current) {
            if !graph.is_valid(next) || !graph.is_passable(next) {
                continue;
            }
            match field.get(next) {
                Some(known) if known <= next_dist => {}
                _ => {
                    field.set(next, next_dist);
                    queue.push_back(next);
                }
            }
        }
    }
    field
}

/// 從終點往回找步數少 1 的鄰格，依 get_neighbors 的順序取第一個
/// 回傳由起點到終點（含兩端）的路徑；終點不可到達或回溯中斷則回傳 None
pub fn backtrack_path(
    graph: &impl PathfindingBoard,
    field: &DistanceField,
    from: Pos,
    to: Pos,
) -> Option<Vec<Pos>> {
    let mut current_dist = field.get(to)?;
    let mut current = to;
    let mut path = vec![to];

    while current != from {
        let prev = graph.get_neighbors(current).into_iter().find(|n| {
            graph.is_valid(*n)
                && graph.is_passable(*n)
                && current_dist > 0
                && field.get(*n) == Some(current_dist - 1)
        });
        // 起點本身可能不在可通行區域，另外判斷
        let prev = match prev {
            Some(p) => p,
            None if current_dist == 1 && graph.get_neighbors(current).contains(&from) => from,
            None => return None,
        };
        current = prev;
        current_dist -= 1;
        path.push(current);
        if current_dist == 0 && current != from {
            return None;
        }
    }

    path.reverse();
    Some(path)
}
