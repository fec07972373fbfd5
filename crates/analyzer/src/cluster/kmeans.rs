//! k-means 군집화
//!
//! k-means++ 초기화(탐욕적, `2 + floor(ln k)`개 후보 시도) 후 Lloyd 반복을 수행합니다.
//! 난수 생성기는 고정 시드로 초기화되므로 같은 입력과 시드는 항상 같은 결과를 냅니다.
//!
//! 수렴 조건:
//! - 할당이 이전 반복과 동일
//! - 중심점 이동량 제곱합이 `tolerance * 평균 특징 분산` 이하
//!
//! 빈 클러스터는 자신의 중심점에서 가장 먼 점으로 재배치하되,
//! 그 거리가 0보다 클 때만 재배치합니다. 동일한 입력은 한 클러스터에 남습니다.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::tfidf::{SparseRow, TfidfMatrix};

/// k-means 파라미터
#[derive(Debug, Clone)]
pub(crate) struct KMeans {
    pub n_clusters: usize,
    pub seed: u64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

/// 희소 행과 밀집 중심점 사이의 제곱 유클리드 거리
///
/// `center_sq`는 중심점의 제곱 노름입니다.
fn squared_distance(row: &SparseRow, center: &[f64], center_sq: f64) -> f64 {
    let mut dist = center_sq;
    for &(j, x) in row {
        dist += x * x - 2.0 * x * center[j];
    }
    dist.max(0.0)
}

fn squared_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

fn densify(row: &SparseRow, n_features: usize) -> Vec<f64> {
    let mut dense = vec![0.0; n_features];
    for &(j, x) in row {
        dense[j] = x;
    }
    dense
}

/// 가장 가까운 중심점 인덱스와 거리 (동률이면 낮은 인덱스)
fn nearest(row: &SparseRow, centers: &[Vec<f64>], center_sq: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, center) in centers.iter().enumerate() {
        let d = squared_distance(row, center, center_sq[c]);
        if d < best.1 {
            best = (c, d);
        }
    }
    best
}

/// 특징별 분산의 평균
fn mean_feature_variance(matrix: &TfidfMatrix) -> f64 {
    let n = matrix.rows.len() as f64;
    if n == 0.0 || matrix.n_features == 0 {
        return 0.0;
    }
    let mut sum = vec![0.0; matrix.n_features];
    let mut sum_sq = vec![0.0; matrix.n_features];
    for row in &matrix.rows {
        for &(j, x) in row {
            sum[j] += x;
            sum_sq[j] += x * x;
        }
    }
    let total: f64 = sum
        .iter()
        .zip(&sum_sq)
        .map(|(s, sq)| {
            let mean = s / n;
            (sq / n - mean * mean).max(0.0)
        })
        .sum();
    total / matrix.n_features as f64
}

impl KMeans {
    /// 각 행의 클러스터 레이블을 계산합니다.
    ///
    /// 호출자는 `rows.len() >= n_clusters >= 1`을 보장해야 합니다.
    pub(crate) fn fit_predict(&self, matrix: &TfidfMatrix) -> Vec<usize> {
        let rows = &matrix.rows;
        if rows.is_empty() || self.n_clusters == 0 {
            return Vec::new();
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centers = self.init_plus_plus(matrix, &mut rng);
        let tol = self.tolerance * mean_feature_variance(matrix);

        let mut labels: Vec<usize> = Vec::new();
        for _ in 0..self.max_iterations {
            let center_sq: Vec<f64> = centers.iter().map(|c| squared_norm(c)).collect();
            let assigned: Vec<(usize, f64)> = rows
                .iter()
                .map(|row| nearest(row, &centers, &center_sq))
                .collect();
            let new_labels: Vec<usize> = assigned.iter().map(|(c, _)| *c).collect();

            if new_labels == labels {
                break;
            }
            labels = new_labels;

            let mut new_centers = self.recompute_centers(matrix, &labels);
            self.relocate_empty(matrix, &assigned, &mut new_centers);

            let shift: f64 = centers
                .iter()
                .zip(&new_centers)
                .map(|(old, new)| {
                    old.iter()
                        .zip(new)
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum::<f64>()
                })
                .sum();
            centers = new_centers;

            if shift <= tol {
                break;
            }
        }

        // 최종 중심점 기준 재할당
        let center_sq: Vec<f64> = centers.iter().map(|c| squared_norm(c)).collect();
        rows.iter()
            .map(|row| nearest(row, &centers, &center_sq).0)
            .collect()
    }

    fn init_plus_plus(&self, matrix: &TfidfMatrix, rng: &mut StdRng) -> Vec<Vec<f64>> {
        let rows = &matrix.rows;
        let n = rows.len();
        let n_trials = 2 + (self.n_clusters as f64).ln().floor() as usize;

        let first = rng.gen_range(0..n);
        let mut centers = vec![densify(&rows[first], matrix.n_features)];
        let first_sq = squared_norm(&centers[0]);
        let mut closest: Vec<f64> = rows
            .iter()
            .map(|row| squared_distance(row, &centers[0], first_sq))
            .collect();
        let mut potential: f64 = closest.iter().sum();

        for _ in 1..self.n_clusters {
            let mut cumulative = Vec::with_capacity(n);
            let mut acc = 0.0;
            for d in &closest {
                acc += d;
                cumulative.push(acc);
            }

            let mut best: Option<(usize, f64, Vec<f64>)> = None;
            for _ in 0..n_trials {
                let target = rng.gen_range(0.0..1.0) * potential;
                let candidate = if potential > 0.0 {
                    cumulative
                        .partition_point(|c| *c < target)
                        .min(n - 1)
                } else {
                    0
                };

                let dense = densify(&rows[candidate], matrix.n_features);
                let dense_sq = squared_norm(&dense);
                let trial: Vec<f64> = rows
                    .iter()
                    .zip(&closest)
                    .map(|(row, current)| current.min(squared_distance(row, &dense, dense_sq)))
                    .collect();
                let trial_potential: f64 = trial.iter().sum();

                let better = match &best {
                    Some((_, pot, _)) => trial_potential < *pot,
                    None => true,
                };
                if better {
                    best = Some((candidate, trial_potential, trial));
                }
            }

            if let Some((candidate, pot, trial)) = best {
                centers.push(densify(&rows[candidate], matrix.n_features));
                closest = trial;
                potential = pot;
            }
        }

        centers
    }

    fn recompute_centers(&self, matrix: &TfidfMatrix, labels: &[usize]) -> Vec<Vec<f64>> {
        let mut sums = vec![vec![0.0; matrix.n_features]; self.n_clusters];
        let mut counts = vec![0usize; self.n_clusters];
        for (row, &label) in matrix.rows.iter().zip(labels) {
            counts[label] += 1;
            for &(j, x) in row {
                sums[label][j] += x;
            }
        }
        for (sum, &count) in sums.iter_mut().zip(&counts) {
            if count > 0 {
                let n = count as f64;
                for v in sum.iter_mut() {
                    *v /= n;
                }
            }
        }
        sums
    }

    /// 빈 클러스터를 가장 먼 점으로 재배치합니다.
    fn relocate_empty(
        &self,
        matrix: &TfidfMatrix,
        assigned: &[(usize, f64)],
        centers: &mut [Vec<f64>],
    ) {
        let mut counts = vec![0usize; self.n_clusters];
        for (label, _) in assigned {
            counts[*label] += 1;
        }
        let empty: Vec<usize> = (0..self.n_clusters).filter(|c| counts[*c] == 0).collect();
        if empty.is_empty() {
            return;
        }

        // 거리 내림차순, 동률이면 앞선 점
        let mut far: Vec<usize> = (0..assigned.len()).collect();
        far.sort_by(|a, b| assigned[*b].1.total_cmp(&assigned[*a].1).then(a.cmp(b)));

        for (cluster, point) in empty.into_iter().zip(far) {
            if assigned[point].1 <= 0.0 {
                break;
            }
            centers[cluster] = densify(&matrix.rows[point], matrix.n_features);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<SparseRow>, n_features: usize) -> TfidfMatrix {
        TfidfMatrix { rows, n_features }
    }

    fn kmeans(k: usize) -> KMeans {
        KMeans {
            n_clusters: k,
            seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }

    #[test]
    fn separates_orthogonal_groups() {
        let m = matrix(
            vec![
                vec![(0, 1.0)],
                vec![(1, 1.0)],
                vec![(0, 1.0)],
                vec![(1, 1.0)],
            ],
            2,
        );
        let labels = kmeans(2).fit_predict(&m);
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[1], labels[3]);
        assert_ne!(labels[0], labels[1]);
    }

    #[test]
    fn identical_points_share_one_cluster() {
        let m = matrix(vec![vec![(0, 1.0)]; 3], 1);
        let labels = kmeans(2).fit_predict(&m);
        assert!(labels.iter().all(|l| *l == labels[0]));
    }

    #[test]
    fn same_seed_same_labels() {
        let rows = vec![
            vec![(0, 0.8), (1, 0.6)],
            vec![(1, 1.0)],
            vec![(2, 1.0)],
            vec![(0, 0.6), (2, 0.8)],
            vec![(0, 1.0)],
        ];
        let m = matrix(rows, 3);
        let first = kmeans(3).fit_predict(&m);
        let second = kmeans(3).fit_predict(&m);
        assert_eq!(first, second);
    }

    #[test]
    fn labels_are_within_range() {
        let rows = (0..20)
            .map(|i| vec![(i % 4, 1.0)])
            .collect::<Vec<_>>();
        let m = matrix(rows, 4);
        let labels = kmeans(3).fit_predict(&m);
        assert!(labels.iter().all(|l| *l < 3));
    }

    #[test]
    fn single_cluster_puts_everything_together() {
        let m = matrix(vec![vec![(0, 1.0)], vec![(1, 1.0)]], 2);
        assert_eq!(kmeans(1).fit_predict(&m), vec![0, 0]);
    }

    #[test]
    fn squared_distance_matches_dense() {
        let row = vec![(0, 0.6), (2, 0.8)];
        let center = vec![0.5, 0.5, 0.0];
        let d = squared_distance(&row, &center, squared_norm(&center));
        let expected = (0.6f64 - 0.5).powi(2) + 0.25 + 0.64;
        assert!((d - expected).abs() < 1e-12);
    }
}
