use insta::assert_snapshot;
use mymo::app::engine::TemplateEngine;
use mymo::domain::model::{OrmBackend, SelectionConfig};

const SERVER_TS: &str = "\
<!-- COMMENT_START -->
Regions below are selected at generation time.
<!-- COMMENT_END -->
import { createServer } from './server'
/* ORM_START */
import { ${ProjectName}Repository } from './repository'
  /* POSTGRES_START */
  import { PrismaClient } from '@prisma/client'
  const db = new PrismaClient()
  /* POSTGRES_END */
  /* MONGO_START */
  import { MongoClient } from 'mongodb'
  const db = new MongoClient(process.env.MONGO_URL)
  /* MONGO_END */
/* ORM_END */
// MSW_START
import './mocks/browser'
// MSW_END
createServer('${projectName}')
";

#[test]
fn postgres_server_template() {
    let engine = TemplateEngine::new(SelectionConfig::new(OrmBackend::Postgres, false), "order_book");
    assert_snapshot!(engine.render(SERVER_TS).trim_end(), @r"
import { createServer } from './server'
import { OrderBookRepository } from './repository'
  import { PrismaClient } from '@prisma/client'
  const db = new PrismaClient()
createServer('order_book')
");
}

#[test]
fn plain_server_template_with_mocks() {
    let engine = TemplateEngine::new(SelectionConfig::new(OrmBackend::None, true), "shop");
    assert_snapshot!(engine.render(SERVER_TS).trim_end(), @r"
import { createServer } from './server'
import './mocks/browser'
createServer('shop')
");
}
