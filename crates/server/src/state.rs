use pooltask_pool::WorkerPool;

pub struct AppState {
    pub pool: WorkerPool,
}
