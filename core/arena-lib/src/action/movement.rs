//! movement.rs：
//! - 負責單位移動相關邏輯（可到達範圍、路徑重建、移動合法性）。
//! - 僅處理移動本身，不負責戰鬥判定或回合流程。
//! - 扣除移動點數與逐格動畫由 battle.rs 處理。
use crate::*;

/// 提供移動邏輯用的棋盤視圖，以區域判斷函式決定可通行格
struct AllowedBoardView<'a, F> {
    board: &'a Board,
    is_allowed: F,
}

impl<F> PathfindingBoard for AllowedBoardView<'_, F>
where
    F: Fn(Pos) -> bool,
{
    fn dimensions(&self) -> (usize, usize) {
        (self.board.rows(), self.board.cols())
    }

    fn is_valid(&self, pos: Pos) -> bool {
        self.board.contains(pos)
    }

    fn is_passable(&self, pos: Pos) -> bool {
        (self.is_allowed)(pos)
    }

    fn get_neighbors(&self, pos: Pos) -> Vec<Pos> {
        self.board.neighbors(pos)
    }
}

/// 計算從 start 出發、預算 budget 步內的距離表
/// budget 小於 0 視為 0（只有起點可到達）
pub fn compute_reachable(
    board: &Board,
    start: Pos,
    budget: Points,
    is_allowed: impl Fn(Pos) -> bool,
) -> DistanceField {
    let view = AllowedBoardView { board, is_allowed };
    bfs(&view, start, budget.max(0) as MovementCost)
}

/// 依距離表重建 from 到 to 的最短路徑（含兩端），無法到達回傳 None
pub fn build_path(
    board: &Board,
    from: Pos,
    to: Pos,
    field: &DistanceField,
    is_allowed: impl Fn(Pos) -> bool,
) -> Option<Vec<Pos>> {
    let view = AllowedBoardView { board, is_allowed };
    backtrack_path(&view, field, from, to)
}

/// 需要高亮的可移動格：0 < 步數 <= budget 且可進入
pub fn reachable_cells(
    board: &Board,
    field: &DistanceField,
    budget: Points,
    is_allowed: impl Fn(Pos) -> bool,
) -> Vec<Pos> {
    if budget <= 0 {
        return vec![];
    }
    field
        .reachable()
        .filter(|(pos, cost)| *cost > 0 && (*cost as Points) <= budget && board.contains(*pos))
        .filter(|(pos, _)| is_allowed(*pos))
        .map(|(pos, _)| pos)
        .collect()
}

/// 單位的可移動範圍
pub fn movable_area(board: &Board, unit: &Unit) -> DistanceField {
    compute_reachable(board, unit.pos, unit.pm, |p| unit.can_enter(board, p))
}

pub fn movable_cells(board: &Board, unit: &Unit) -> Vec<Pos> {
    let field = movable_area(board, unit);
    reachable_cells(board, &field, unit.pm, |p| unit.can_enter(board, p))
}

/// 一次合法移動：路徑與消耗的移動點數
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub path: Vec<Pos>,
    pub cost: Points,
}

/// 檢查移動是否合法：0 < cost <= pm 且路徑存在
pub fn plan_move(board: &Board, unit: &Unit, to: Pos) -> Result<MovePlan, Error> {
    let func = "plan_move";

    if !board.contains(to) {
        return Err(Error::OutOfBounds { func, pos: to });
    }
    let field = movable_area(board, unit);
    let Some(cost) = field.get(to) else {
        return Err(Error::NotReachable { func, pos: to });
    };
    let cost = cost as Points;
    if cost <= 0 || cost > unit.pm {
        return Err(Error::NotReachable { func, pos: to });
    }
    let Some(path) = build_path(board, unit.pos, to, &field, |p| unit.can_enter(board, p)) else {
        // 同一份距離表與判斷式不該發生
        debug_assert!(false, "reachable cell {to:?} has no path");
        return Err(Error::PathInconsistent { func, pos: to });
    };
    Ok(MovePlan { path, cost })
}
