//! Bônus de economia circular.
//!
//! A tabela é varrida sobre reuso × reciclagem em passos de 5 até os
//! percentuais de entrada; cada célula vale
//! `r·0.25 + c·0.35 + min(r, c)·0.1`, com multiplicador de sinergia 1.15
//! quando ambos são diferentes de zero. O bônus usado é a célula do ponto
//! exato de entrada, que é sempre a última da varredura.

/// Passo da grade (pontos percentuais).
pub const GRID_STEP: f64 = 5.0;

/// Peso do reuso.
pub const REUSE_WEIGHT: f64 = 0.25;

/// Peso da reciclagem.
pub const RECYCLE_WEIGHT: f64 = 0.35;

/// Peso da sobreposição reuso/reciclagem.
pub const OVERLAP_WEIGHT: f64 = 0.1;

/// Multiplicador quando reuso e reciclagem coexistem.
pub const SYNERGY_MULTIPLIER: f64 = 1.15;

/// Limite superior da grade intermediária (domínio percentual).
const GRID_LIMIT: f64 = 100.0;

/// Valor de uma célula da tabela.
pub fn cell_value(reuse: f64, recycle: f64) -> f64 {
    let base = reuse * REUSE_WEIGHT + recycle * RECYCLE_WEIGHT + reuse.min(recycle) * OVERLAP_WEIGHT;

    if reuse != 0.0 && recycle != 0.0 {
        base * SYNERGY_MULTIPLIER
    } else {
        base
    }
}

/// Pontos de um eixo: 0, 5, 10, ... abaixo do alvo, e o próprio alvo por último.
///
/// Pontos intermediários ficam limitados a 0-100 para que percentuais
/// absurdos não gerem tabelas gigantes.
fn grid_axis(target: f64) -> Vec<f64> {
    let bound = target.min(GRID_LIMIT);
    let mut axis = Vec::new();

    let mut step = 0u32;
    loop {
        let point = f64::from(step) * GRID_STEP;
        if !(point < bound) {
            break;
        }
        axis.push(point);
        step += 1;
    }

    axis.push(target);
    axis
}

/// Tabela de bônus circular.
#[derive(Debug, Clone)]
pub struct CircularBonusTable {
    reuse_axis: Vec<f64>,
    recycle_axis: Vec<f64>,
    cells: Vec<Vec<f64>>,
}

impl CircularBonusTable {
    /// Varre a grade até (`reuse`, `recycle`).
    pub fn sweep(reuse: f64, recycle: f64) -> Self {
        let reuse_axis = grid_axis(reuse);
        let recycle_axis = grid_axis(recycle);

        let cells = reuse_axis
            .iter()
            .map(|&r| recycle_axis.iter().map(|&c| cell_value(r, c)).collect())
            .collect();

        Self {
            reuse_axis,
            recycle_axis,
            cells,
        }
    }

    /// Bônus no ponto de entrada.
    pub fn final_bonus(&self) -> f64 {
        self.cells
            .last()
            .and_then(|row| row.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Valor da célula (`i`, `j`), se existir.
    pub fn value_at(&self, i: usize, j: usize) -> Option<f64> {
        self.cells.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Dimensões (linhas de reuso, colunas de reciclagem).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.reuse_axis.len(), self.recycle_axis.len())
    }
}

/// Bônus circular para os percentuais informados.
pub fn circular_bonus(reuse: f64, recycle: f64) -> f64 {
    CircularBonusTable::sweep(reuse, recycle).final_bonus()
}
