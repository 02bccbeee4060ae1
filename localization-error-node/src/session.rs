use std::time::SystemTime;

use localization_error::{
    msg::{Header, PoseArray},
    PosePair, PoseSample,
};

/// Everything received since the last publish.
#[derive(Debug, Default)]
pub struct Session {
    last_update_time: Option<SystemTime>,
    pairs: Vec<PosePair>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, localization: PoseSample, ground_truth: Option<PoseSample>) {
        self.last_update_time = Some(localization.stamp());
        self.pairs.push(PosePair::new(localization, ground_truth));
    }

    /// Number of poses received since the last publish, paired or not.
    pub fn poses_received(&self) -> usize {
        self.pairs.len()
    }

    pub fn unpaired(&self) -> usize {
        self.pairs.iter().filter(|pair| !pair.is_paired()).count()
    }

    pub fn last_update_time(&self) -> Option<SystemTime> {
        self.last_update_time
    }

    pub fn pairs(&self) -> &[PosePair] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Localization and ground-truth histories of the paired samples, in
    /// arrival order. Both arrays always have the same length.
    pub fn pose_histories(&self, header: &Header) -> (PoseArray, PoseArray) {
        let (localization, simulation): (Vec<_>, Vec<_>) = self
            .pairs
            .iter()
            .filter_map(|pair| {
                let ground_truth = pair.ground_truth.as_ref()?;
                Some((pair.localization.to_pose_msg(), ground_truth.to_pose_msg()))
            })
            .unzip();
        (
            PoseArray {
                header: header.clone(),
                poses: localization,
            },
            PoseArray {
                header: header.clone(),
                poses: simulation,
            },
        )
    }

    /// Drops every sample. The last update time is kept.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}
